//! Result list state: the current [`ResultSet`] and which single row is open.

use std::fmt;

use eatnear_places::Restaurant;
use reqwest::Url;

use crate::search::ResultSet;

/// Shown in place of the list when a search came back empty.
pub const NO_RESULTS_MESSAGE: &str =
    "Sorry, no restaurant found 🤭.\nMaybe try closer to a big town? 🏙";

const MAPS_BASE_URL: &str = "https://maps.google.com/";

/// Index of the one expanded row, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpansionState(Option<usize>);

impl ExpansionState {
    pub const fn none() -> Self {
        Self(None)
    }

    pub const fn selected(self) -> Option<usize> {
        self.0
    }

    pub fn is_expanded(self, index: usize) -> bool {
        self.0 == Some(index)
    }
}

/// The list shown under the form.
///
/// `results` is `None` until the first search (and after a location reset);
/// `Some` of an empty set means a search found nothing. The expansion is reset
/// every time `results` changes, so a selected index always points into the
/// current set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultList {
    results: Option<ResultSet>,
    expansion: ExpansionState,
}

impl ResultList {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub const fn expansion(&self) -> ExpansionState {
        self.expansion
    }

    /// Swap in a new result set and collapse everything.
    pub fn replace(&mut self, results: ResultSet) {
        self.results = Some(results);
        self.expansion = ExpansionState::none();
    }

    /// Forget the current results, e.g. after the coordinates moved.
    pub fn clear(&mut self) {
        self.results = None;
        self.expansion = ExpansionState::none();
    }

    /// Open row `index`, implicitly closing whichever row was open.
    ///
    /// Returns `false` and leaves the state alone if there is no such row.
    pub fn expand(&mut self, index: usize) -> bool {
        let in_range = self.results.as_ref().is_some_and(|r| index < r.len());
        if in_range {
            self.expansion = ExpansionState(Some(index));
        }
        in_range
    }

    pub fn collapse(&mut self) {
        self.expansion = ExpansionState::none();
    }

    /// Per-row open/close callback.
    pub fn set_expanded(&mut self, index: usize, should_open: bool) -> bool {
        if should_open {
            self.expand(index)
        } else {
            self.collapse();
            true
        }
    }

    /// Flip row `index`: open it if closed, close it if open.
    pub fn toggle(&mut self, index: usize) -> bool {
        let open = self.expansion.is_expanded(index);
        self.set_expanded(index, !open)
    }

    pub fn expanded_row(&self) -> Option<&Restaurant> {
        let index = self.expansion.selected()?;
        self.results.as_ref()?.get(index)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ResultList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(results) = &self.results else {
            return Ok(());
        };
        if results.is_empty() {
            return writeln!(f, "{NO_RESULTS_MESSAGE}");
        }
        for (index, restaurant) in results.iter().enumerate() {
            write!(
                f,
                "{}",
                RowDisplay {
                    index,
                    restaurant,
                    expanded: self.expansion.is_expanded(index),
                }
            )?;
        }
        Ok(())
    }
}

/// One row: a summary line, plus address, map link and tags when expanded.
pub struct RowDisplay<'a> {
    pub index: usize,
    pub restaurant: &'a Restaurant,
    pub expanded: bool,
}

impl fmt::Display for RowDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let restaurant = self.restaurant;
        let marker = if self.expanded { '▾' } else { '▸' };
        write!(f, "{:>2}. {marker} {}", self.index + 1, restaurant.title)?;

        let stars = restaurant.stars();
        if stars > 0 {
            write!(f, "  {}", "⭐".repeat(stars))?;
        }
        writeln!(f, "  {} m", restaurant.distance)?;

        if self.expanded {
            let address = restaurant.address();
            writeln!(f, "      📍 {address}")?;
            writeln!(f, "      {}", maps_link(&address))?;
            if !restaurant.tags.is_empty() {
                f.write_str("     ")?;
                for tag in &restaurant.tags {
                    write!(f, " #{}", tag.title)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

pub fn render_row(index: usize, restaurant: &Restaurant, expanded: bool) -> String {
    RowDisplay {
        index,
        restaurant,
        expanded,
    }
    .to_string()
}

/// External map search for an address.
pub fn maps_link(address: &str) -> String {
    Url::parse_with_params(MAPS_BASE_URL, &[("q", address)])
        .map_or_else(|_| format!("{MAPS_BASE_URL}?q={address}"), |url| url.to_string())
}

#[cfg(test)]
mod tests {
    use eatnear_places::Tag;

    use super::*;

    fn restaurant(title: &str, distance: f64) -> Restaurant {
        Restaurant {
            distance,
            title: title.to_string(),
            vicinity: "Blekingegatan 40<br/>116 62 Stockholm".to_string(),
            tags: vec![
                Tag {
                    title: "swedish".to_string(),
                },
                Tag {
                    title: "husmanskost".to_string(),
                },
            ],
            position: [59.31, 18.07],
            average_rating: 4.0,
        }
    }

    fn list_of(n: usize) -> ResultList {
        let mut list = ResultList::new();
        list.replace(ResultSet::rank(
            (0..n).map(|i| restaurant(&format!("R{i}"), i as f64 * 10.0)),
        ));
        list
    }

    #[test]
    fn test_expand_overwrites_previous() {
        let mut list = list_of(10);

        assert!(list.expand(2));
        assert!(list.expand(5));
        assert_eq!(list.expansion().selected(), Some(5));
        assert!(!list.expansion().is_expanded(2));
    }

    #[test]
    fn test_expand_out_of_range_is_ignored() {
        let mut list = list_of(3);
        assert!(list.expand(1));
        assert!(!list.expand(3));
        assert_eq!(list.expansion().selected(), Some(1));

        let mut empty = ResultList::new();
        assert!(!empty.expand(0));
        assert_eq!(empty.expansion().selected(), None);
    }

    #[test]
    fn test_set_expanded_and_toggle() {
        let mut list = list_of(4);

        assert!(list.set_expanded(1, true));
        assert_eq!(list.expansion().selected(), Some(1));

        list.set_expanded(1, false);
        assert_eq!(list.expansion().selected(), None);

        list.toggle(3);
        assert_eq!(list.expansion().selected(), Some(3));
        list.toggle(0);
        assert_eq!(list.expansion().selected(), Some(0));
        list.toggle(0);
        assert_eq!(list.expansion().selected(), None);
    }

    #[test]
    fn test_replace_and_clear_reset_expansion() {
        let mut list = list_of(5);
        list.expand(4);

        list.replace(ResultSet::rank(vec![restaurant("only", 1.0)]));
        assert_eq!(list.expansion().selected(), None);
        assert_eq!(list.results().map(|r| r.len()), Some(1));

        list.expand(0);
        list.clear();
        assert_eq!(list.expansion().selected(), None);
        assert!(list.results().is_none());
    }

    #[test]
    fn test_expanded_row() {
        let mut list = list_of(3);
        assert!(list.expanded_row().is_none());
        list.expand(2);
        assert_eq!(list.expanded_row().map(|r| r.title.as_str()), Some("R2"));
    }

    #[test]
    fn test_render_empty_result_set() {
        let mut list = ResultList::new();
        list.replace(ResultSet::rank(Vec::new()));
        assert_eq!(list.render(), format!("{NO_RESULTS_MESSAGE}\n"));
    }

    #[test]
    fn test_render_before_first_search() {
        assert_eq!(ResultList::new().render(), "");
    }

    #[test]
    fn test_render_rows() {
        let mut list = list_of(2);
        list.expand(1);
        let rendered = list.render();
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines[0], " 1. ▸ R0  ⭐⭐⭐⭐  0 m");
        assert_eq!(lines[1], " 2. ▾ R1  ⭐⭐⭐⭐  10 m");
        assert_eq!(lines[2], "      📍 Blekingegatan 40, 116 62 Stockholm");
        assert_eq!(
            lines[3],
            "      https://maps.google.com/?q=Blekingegatan+40%2C+116+62+Stockholm"
        );
        assert_eq!(lines[4], "      #swedish #husmanskost");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_render_row_without_rating_or_tags() {
        let mut plain = restaurant("Plain", 7.0);
        plain.average_rating = 0.0;
        plain.tags.clear();

        assert_eq!(render_row(0, &plain, false), " 1. ▸ Plain  7 m\n");
        let expanded = render_row(0, &plain, true);
        assert_eq!(expanded.lines().count(), 3);
    }

    #[test]
    fn test_row_display_matches_list_rendering() {
        let mut list = list_of(3);
        list.expand(1);
        let results = list.results().unwrap();

        let rows: String = results
            .iter()
            .enumerate()
            .map(|(index, restaurant)| {
                RowDisplay {
                    index,
                    restaurant,
                    expanded: index == 1,
                }
                .to_string()
            })
            .collect();
        assert_eq!(rows, list.to_string());
        let tenth = RowDisplay {
            index: 9,
            restaurant: &results[0],
            expanded: false,
        };
        assert_eq!(tenth.to_string(), "10. ▸ R0  ⭐⭐⭐⭐  0 m\n");
    }
}
