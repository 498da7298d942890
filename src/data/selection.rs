/// Number of numeric columns selected when the user has not chosen any.
pub const DEFAULT_SELECTION: usize = 3;

/// Resolve the parameters to plot and export.
///
/// * `None` → the first [`DEFAULT_SELECTION`] columns of `universe`.
/// * `Some(names)` → those names that are in `universe`, in universe order.
pub fn resolve(universe: &[String], requested: Option<&[String]>) -> Vec<String> {
    match requested {
        None => universe.iter().take(DEFAULT_SELECTION).cloned().collect(),
        Some(names) => universe
            .iter()
            .filter(|col| names.contains(col))
            .cloned()
            .collect(),
    }
}

/// Flip one parameter in or out of `selected`, keeping universe order.
pub fn toggle(selected: &[String], universe: &[String], name: &str) -> Vec<String> {
    let currently = selected.iter().any(|s| s == name);
    universe
        .iter()
        .filter(|col| {
            if col.as_str() == name {
                !currently
            } else {
                selected.contains(col)
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_is_first_three() {
        let universe = names(&["temp", "ph", "o2", "ec"]);
        assert_eq!(resolve(&universe, None), names(&["temp", "ph", "o2"]));
        assert_eq!(resolve(&names(&["ph"]), None), names(&["ph"]));
        assert!(resolve(&[], None).is_empty());
    }

    #[test]
    fn explicit_selection_is_filtered_to_universe() {
        let universe = names(&["temp", "ph", "o2"]);
        let requested = names(&["o2", "gone", "temp"]);
        assert_eq!(resolve(&universe, Some(requested.as_slice())), names(&["temp", "o2"]));
        assert!(resolve(&universe, Some(&[][..])).is_empty());
    }

    #[test]
    fn toggle_adds_and_removes() {
        let universe = names(&["temp", "ph", "o2"]);
        let selected = names(&["o2"]);
        let selected = toggle(&selected, &universe, "temp");
        assert_eq!(selected, names(&["temp", "o2"]));
        let selected = toggle(&selected, &universe, "o2");
        assert_eq!(selected, names(&["temp"]));
        let selected = toggle(&selected, &universe, "unknown");
        assert_eq!(selected, names(&["temp"]));
    }
}
