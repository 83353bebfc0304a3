//! The 13 XPath 1.0 structural axes
//!
//! Forward axes produce document order natively; the four reverse axes
//! (ancestor, ancestor-or-self, preceding, preceding-sibling) produce
//! nearest-first order and are materialized and reversed by the cursor
//! before any node is exposed.

use std::fmt;

/// One of the thirteen structural relations selecting nodes related to a
/// context node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    SelfAxis,
    Child,
    Parent,
    Ancestor,
    AncestorOrSelf,
    Descendant,
    DescendantOrSelf,
    Following,
    FollowingSibling,
    Preceding,
    PrecedingSibling,
    Attribute,
    Namespace,
}

impl Axis {
    /// All axes, for exhaustive fixture sweeps.
    pub const ALL: [Axis; 13] = [
        Axis::SelfAxis,
        Axis::Child,
        Axis::Parent,
        Axis::Ancestor,
        Axis::AncestorOrSelf,
        Axis::Descendant,
        Axis::DescendantOrSelf,
        Axis::Following,
        Axis::FollowingSibling,
        Axis::Preceding,
        Axis::PrecedingSibling,
        Axis::Attribute,
        Axis::Namespace,
    ];

    /// True for the four axes whose native production order is
    /// nearest-first rather than document order.
    #[inline]
    pub fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Ancestor | Axis::AncestorOrSelf | Axis::Preceding | Axis::PrecedingSibling
        )
    }

    /// The axis name as written in expressions (`following-sibling`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::SelfAxis => "self",
            Axis::Child => "child",
            Axis::Parent => "parent",
            Axis::Ancestor => "ancestor",
            Axis::AncestorOrSelf => "ancestor-or-self",
            Axis::Descendant => "descendant",
            Axis::DescendantOrSelf => "descendant-or-self",
            Axis::Following => "following",
            Axis::FollowingSibling => "following-sibling",
            Axis::Preceding => "preceding",
            Axis::PrecedingSibling => "preceding-sibling",
            Axis::Attribute => "attribute",
            Axis::Namespace => "namespace",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_axes() {
        let reverse: Vec<Axis> = Axis::ALL.iter().copied().filter(|a| a.is_reverse()).collect();
        assert_eq!(
            reverse,
            vec![
                Axis::Ancestor,
                Axis::AncestorOrSelf,
                Axis::Preceding,
                Axis::PrecedingSibling
            ]
        );
    }

    #[test]
    fn test_axis_names() {
        assert_eq!(Axis::FollowingSibling.as_str(), "following-sibling");
        assert_eq!(Axis::SelfAxis.to_string(), "self");
        assert_eq!(Axis::ALL.len(), 13);
    }
}
