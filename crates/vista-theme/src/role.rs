//! Semantic roles: what a span of text means, independent of its color.

/// A closed set of styling roles.
///
/// Each role resolves to exactly one [`TextAttr`](vista_term::cell::TextAttr)
/// through a [`RoleRegistry`](crate::RoleRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Ordinary body text.
    Text,
    /// Search hit.
    Search,
    Ok,
    Error,
    Warning,
    /// Alternating row, drawn as bold body text.
    AltRow,
    /// Placeholder for content that was hidden.
    Hidden,
    AdjustedTime,
    SkewedTime,
    OffsetTime,

    Status,
    WarnStatus,
    AlertStatus,
    ActiveStatus,
    ActiveStatus2,
    BoldStatus,
    ViewStatus,
    InactiveStatus,
    Popup,

    Keyword,
    String,
    Comment,
    Variable,
    Symbol,
    ReSpecial,
    ReRepeat,
    File,

    DiffDelete,
    DiffAdd,
    DiffSection,

    LowThreshold,
    MedThreshold,
    HighThreshold,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Self; 33] = [
        Self::Text,
        Self::Search,
        Self::Ok,
        Self::Error,
        Self::Warning,
        Self::AltRow,
        Self::Hidden,
        Self::AdjustedTime,
        Self::SkewedTime,
        Self::OffsetTime,
        Self::Status,
        Self::WarnStatus,
        Self::AlertStatus,
        Self::ActiveStatus,
        Self::ActiveStatus2,
        Self::BoldStatus,
        Self::ViewStatus,
        Self::InactiveStatus,
        Self::Popup,
        Self::Keyword,
        Self::String,
        Self::Comment,
        Self::Variable,
        Self::Symbol,
        Self::ReSpecial,
        Self::ReRepeat,
        Self::File,
        Self::DiffDelete,
        Self::DiffAdd,
        Self::DiffSection,
        Self::LowThreshold,
        Self::MedThreshold,
        Self::HighThreshold,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in [`Role::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_discriminant_order() {
        for (i, role) in Role::ALL.iter().enumerate() {
            assert_eq!(role.index(), i, "{role:?}");
        }
    }

    #[test]
    fn count_covers_last_variant() {
        assert_eq!(Role::HighThreshold.index() + 1, Role::COUNT);
    }
}
