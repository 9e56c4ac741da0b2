//! Static cascade table: which collections reference each entity kind.
//!
//! Rule order is significant. It decides which dependent type a blocked
//! deletion reports and the order in which a forced deletion removes dependents.

use cadenza_core::{DependentRule, EntityKind, MatchKind};

static ARTIST_DEPENDENTS: [DependentRule; 2] = [
    DependentRule {
        dependent: EntityKind::Track,
        match_kind: MatchKind::ArrayContains,
        field: "artists",
        display_field: "name",
    },
    DependentRule {
        dependent: EntityKind::Album,
        match_kind: MatchKind::ArrayContains,
        field: "artists",
        display_field: "name",
    },
];

static ALBUM_DEPENDENTS: [DependentRule; 1] = [DependentRule {
    dependent: EntityKind::Track,
    match_kind: MatchKind::Scalar,
    field: "album",
    display_field: "name",
}];

static GENRE_DEPENDENTS: [DependentRule; 1] = [DependentRule {
    dependent: EntityKind::Album,
    match_kind: MatchKind::ArrayContains,
    field: "genres",
    display_field: "name",
}];

pub fn rules_for(kind: EntityKind) -> &'static [DependentRule] {
    match kind {
        EntityKind::Artist => &ARTIST_DEPENDENTS,
        EntityKind::Album => &ALBUM_DEPENDENTS,
        EntityKind::Genre => &GENRE_DEPENDENTS,
        EntityKind::Track => &[],
    }
}
