//! Entry list filters
//!
//! Deserialized from the same query string as the paging parameters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{Entry, EntrySource};
use crate::handlers::Owner;
use crate::repository::FilterChain;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilters {
    #[serde(default)]
    pub habit_id: Option<String>,

    /// Inclusive lower bound on `date`
    #[serde(default)]
    pub from_date: Option<NaiveDate>,

    /// Inclusive upper bound on `date`
    #[serde(default)]
    pub to_date: Option<NaiveDate>,

    #[serde(default)]
    pub source: Option<EntrySource>,

    #[serde(default)]
    pub is_archived: Option<bool>,

    /// Case-insensitive substring of `notes`
    #[serde(default)]
    pub q: Option<String>,
}

impl EntryFilters {
    /// Owner scope followed by every filter that was supplied
    pub fn chain(&self, owner: &Owner) -> FilterChain<Entry> {
        let user_id = owner.id().to_string();
        let search = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        FilterChain::new()
            .and(move |e: &Entry| e.is_owned_by(&user_id))
            .and_if(self.habit_id.clone(), |e: &Entry, id: &String| &e.habit_id == id)
            .and_if(self.from_date, |e: &Entry, from: &NaiveDate| e.date >= *from)
            .and_if(self.to_date, |e: &Entry, to: &NaiveDate| e.date <= *to)
            .and_if(self.source, |e: &Entry, source: &EntrySource| e.source == *source)
            .and_if(self.is_archived, |e: &Entry, archived: &bool| {
                e.is_archived == *archived
            })
            .and_if(search, |e: &Entry, q: &String| {
                e.notes
                    .as_deref()
                    .is_some_and(|notes| notes.to_lowercase().contains(q.as_str()))
            })
    }

    /// Filters as link query pairs, in a fixed order
    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("habitId", self.habit_id.clone()),
            ("fromDate", self.from_date.map(|d| d.to_string())),
            ("toDate", self.to_date.map(|d| d.to_string())),
            ("source", self.source.map(|s| s.to_string())),
            ("isArchived", self.is_archived.map(|a| a.to_string())),
            ("q", self.q.clone()),
        ]
    }
}
