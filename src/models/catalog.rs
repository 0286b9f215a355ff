use indexmap::IndexMap;

use super::ItemId;

/// Movie catalog: item id to display title, in file order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    titles: IndexMap<ItemId, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: ItemId, title: String) {
        self.titles.insert(item, title);
    }

    pub fn title(&self, item: &ItemId) -> Option<&str> {
        self.titles.get(item).map(String::as_str)
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.titles.contains_key(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &str)> + '_ {
        self.titles.iter().map(|(item, title)| (item, title.as_str()))
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl<T: Into<String>> FromIterator<(ItemId, T)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (ItemId, T)>>(iter: I) -> Self {
        Self {
            titles: iter
                .into_iter()
                .map(|(item, title)| (item, title.into()))
                .collect(),
        }
    }
}
