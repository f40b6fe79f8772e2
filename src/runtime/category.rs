use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Evaluation-mode bitset threaded through every [`Context`](super::Context).
    ///
    /// The same bits double as declaration modifiers on a
    /// [`Declaration`](super::pattern::Declaration) record (`PUBLIK`, `LOCAL`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Category: u8 {
        const MIXIN      = 1 << 0;
        const FLAGS      = 1 << 1;
        const PUBLIK     = 1 << 2;
        const LOCAL      = 1 << 3;
        const DONT_CLONE = 1 << 4;
    }
}

impl Category {
    pub const EMPTY: Category = Category::empty();

    /// True when `self` has no bit outside `bits`.
    pub fn contains_less_than(self, bits: Category) -> bool {
        bits.contains(self)
    }
}

fn display_name(flag: &str) -> &str {
    match flag {
        "MIXIN" => "mixin",
        "FLAGS" => "flags",
        "PUBLIK" => "publik",
        "LOCAL" => "local",
        "DONT_CLONE" => "dontClone",
        other => other,
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "empty");
        }
        let names: Vec<&str> = self
            .iter_names()
            .map(|(name, _)| display_name(name))
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn contains_requires_every_queried_bit() {
        let category = Category::MIXIN | Category::DONT_CLONE;
        assert!(category.contains(Category::MIXIN));
        assert!(category.contains(Category::MIXIN | Category::DONT_CLONE));
        assert!(!category.contains(Category::FLAGS));
        assert!(category.contains(Category::EMPTY));
    }

    #[test]
    fn contains_less_than_rejects_foreign_bits() {
        let allowed = Category::PUBLIK | Category::LOCAL;
        assert!(Category::EMPTY.contains_less_than(allowed));
        assert!(Category::PUBLIK.contains_less_than(allowed));
        assert!(!(Category::PUBLIK | Category::MIXIN).contains_less_than(allowed));
        assert!(!Category::LOCAL.contains_less_than(Category::PUBLIK));
        assert!(!Category::PUBLIK.contains_less_than(Category::EMPTY));
    }

    #[test]
    fn difference_clears_only_named_bits() {
        let category = Category::MIXIN | Category::FLAGS | Category::DONT_CLONE;
        let cleared = category.difference(Category::FLAGS);
        assert!(cleared.contains(Category::MIXIN | Category::DONT_CLONE));
        assert!(!cleared.contains(Category::FLAGS));
    }

    #[test]
    fn display_lists_bit_names() {
        assert_eq!(Category::EMPTY.to_string(), "empty");
        assert_eq!(
            (Category::PUBLIK | Category::DONT_CLONE).to_string(),
            "publik|dontClone"
        );
    }
}
