use std::{fs::File, io::Write, path::Path};

use csv::{Terminator, WriterBuilder};

use crate::{error::AppResult, models::Recommendation};

/// Header row of the saved recommendations file
pub const CSV_HEADER: [&str; 3] = ["Rank", "Movie Title", "Score"];

/// Rounds a score to two decimal places, ties to even
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round_ties_even() / 100.0
}

/// Score text for the saved file; integral values keep their `.0`
fn format_score(score: f64) -> String {
    format!("{:?}", round_score(score))
}

/// Renders recommendations as numbered console lines
pub fn render_table(recommendations: &[Recommendation]) -> String {
    recommendations
        .iter()
        .enumerate()
        .map(|(idx, rec)| format!("{}. {} (score: {:.2})\n", idx + 1, rec.title, rec.score))
        .collect()
}

/// Writes recommendations as `Rank,Movie Title,Score` rows with CRLF line
/// endings
pub fn write_csv<W: Write>(recommendations: &[Recommendation], writer: W) -> AppResult<()> {
    let mut csv_writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for (idx, rec) in recommendations.iter().enumerate() {
        csv_writer.write_record([
            (idx + 1).to_string(),
            rec.title.clone(),
            format_score(rec.score),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Saves recommendations to a CSV file, replacing any existing file
pub fn save_recommendations(recommendations: &[Recommendation], path: &Path) -> AppResult<()> {
    let file = File::create(path)?;
    write_csv(recommendations, file)?;
    tracing::info!(
        path = %path.display(),
        rows = recommendations.len(),
        "Recommendations saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemId;

    fn recs() -> Vec<Recommendation> {
        vec![
            Recommendation {
                item: ItemId::from("2571"),
                title: "Matrix, The (1999)".to_string(),
                score: 8.456,
            },
            Recommendation {
                item: ItemId::from("1"),
                title: "Toy Story (1995)".to_string(),
                score: 4.2,
            },
        ]
    }

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(4.456), 4.46);
        assert_eq!(round_score(4.2), 4.2);
        assert_eq!(round_score(0.0), 0.0);
        assert_eq!(round_score(0.125), 0.12);
        assert_eq!(round_score(0.375), 0.38);
    }

    #[test]
    fn test_integral_scores_keep_decimal_point() {
        assert_eq!(format_score(4.0), "4.0");
        assert_eq!(format_score(3.999999999), "4.0");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(8.456), "8.46");
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&recs());
        assert_eq!(
            table,
            "1. Matrix, The (1999) (score: 8.46)\n2. Toy Story (1995) (score: 4.20)\n"
        );
    }

    #[test]
    fn test_render_empty_table() {
        assert_eq!(render_table(&[]), "");
    }

    #[test]
    fn test_write_csv_quotes_titles_with_commas() {
        let mut out = Vec::new();
        write_csv(&recs(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Rank,Movie Title,Score\r\n1,\"Matrix, The (1999)\",8.46\r\n2,Toy Story (1995),4.2\r\n"
        );
    }

    #[test]
    fn test_save_recommendations_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recommendations.csv");

        save_recommendations(&recs(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Rank,Movie Title,Score\r\n"));
        assert_eq!(text.lines().count(), 3);
    }
}
