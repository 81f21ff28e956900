use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display, io::Read};

use crate::error::{AppError, AppResult};

/// Stable MyAnimeList identifier, shared by both tables and the poster API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimeId(pub u32);

impl Display for AnimeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of an anime table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub anime_id: AnimeId,
    pub name: String,
}

impl Item {
    pub fn new(anime_id: u32, name: impl Into<String>) -> Self {
        Self {
            anime_id: AnimeId(anime_id),
            name: name.into(),
        }
    }
}

/// Ordered table of items. Row position is the row index into the aligned
/// similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct ItemTable {
    items: Vec<Item>,
    /// name → first row carrying that name
    by_name: HashMap<String, usize>,
    /// id → first row carrying that id
    by_id: HashMap<AnimeId, usize>,
}

impl ItemTable {
    pub fn new(items: Vec<Item>) -> Self {
        let mut by_name = HashMap::with_capacity(items.len());
        let mut by_id = HashMap::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            by_name.entry(item.name.clone()).or_insert(position);
            by_id.entry(item.anime_id).or_insert(position);
        }

        Self {
            items,
            by_name,
            by_id,
        }
    }

    /// Parses a CSV table with at least `anime_id` and `name` columns.
    ///
    /// Extra columns (genre, rating, members, ...) are ignored.
    pub fn from_csv<R: Read>(reader: R) -> AppResult<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut items = Vec::new();

        for record in reader.deserialize::<Item>() {
            items.push(record?);
        }

        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Row position of the first item whose name matches exactly
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        self.position_of(name).and_then(|position| self.items.get(position))
    }

    pub fn find_by_id(&self, anime_id: AnimeId) -> Option<&Item> {
        self.by_id
            .get(&anime_id)
            .and_then(|&position| self.items.get(position))
    }

    /// Identifier at a row position, failing when the position is past the table
    pub fn id_at(&self, position: usize) -> AppResult<AnimeId> {
        self.items
            .get(position)
            .map(|item| item.anime_id)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "row {} out of range for table of {} items",
                    position,
                    self.items.len()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> ItemTable {
        ItemTable::new(vec![
            Item::new(1535, "Death Note"),
            Item::new(5114, "Fullmetal Alchemist: Brotherhood"),
            Item::new(9999, "Death Note"),
            Item::new(16498, "Shingeki no Kyojin"),
        ])
    }

    #[test]
    fn test_anime_id_display() {
        assert_eq!(format!("{}", AnimeId(5114)), "5114");
    }

    #[test]
    fn test_anime_id_serializes_as_number() {
        let json = serde_json::to_string(&AnimeId(32281)).unwrap();
        assert_eq!(json, "32281");
    }

    #[test]
    fn test_position_of_returns_first_match() {
        let table = sample_table();
        assert_eq!(table.position_of("Death Note"), Some(0));
        assert_eq!(table.position_of("Shingeki no Kyojin"), Some(3));
    }

    #[test]
    fn test_position_of_requires_exact_name() {
        let table = sample_table();
        assert_eq!(table.position_of("death note"), None);
        assert_eq!(table.position_of("Death Note "), None);
    }

    #[test]
    fn test_find_by_id() {
        let table = sample_table();
        let item = table.find_by_id(AnimeId(16498)).unwrap();
        assert_eq!(item.name, "Shingeki no Kyojin");
        assert!(table.find_by_id(AnimeId(1)).is_none());
    }

    #[test]
    fn test_id_at_out_of_range() {
        let table = sample_table();
        assert_eq!(table.id_at(1).unwrap(), AnimeId(5114));
        assert!(matches!(table.id_at(4), Err(AppError::Internal(_))));
    }

    #[test]
    fn test_from_csv_ignores_extra_columns() {
        let data = "anime_id,name,genre,type,episodes,rating,members\n\
                    32281,Kimi no Na wa.,\"Drama, Romance, School, Supernatural\",Movie,1,9.37,200630\n\
                    5114,Fullmetal Alchemist: Brotherhood,\"Action, Adventure\",TV,64,9.26,793665\n";

        let table = ItemTable::from_csv(data.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).unwrap().name, "Kimi no Na wa.");
        assert_eq!(table.get(1).unwrap().anime_id, AnimeId(5114));
    }

    #[test]
    fn test_from_csv_rejects_bad_id() {
        let data = "anime_id,name\nnot-a-number,Broken\n";
        let result = ItemTable::from_csv(data.as_bytes());
        assert!(matches!(result, Err(AppError::Csv(_))));
    }
}
