//! Game concept types that describe Legion TD 2 balance data.
//!
//! The data files identify enumeration members by an internal string key
//! (e.g. `arm_light` for swift armor). Each enumeration here carries that
//! key table plus the member names used when generating source. Every
//! enumeration ends with an `Illegal` sentinel whose internal name is empty;
//! it never matches real data and only appears in generated output as the
//! substitute for an absent or unrecognized value.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::defs::UnitDef;

/// Common surface of the five game enumerations, used by the generic
/// tagged-cell decoder and the source emitters.
pub trait GameEnum: Copy + Sized + 'static {
    /// The enumeration's type name as emitted in generated source.
    const NAME: &'static str;
    /// All members in declared order, `Illegal` last.
    const VARIANTS: &'static [Self];
    /// The sentinel member substituted for absent values at emission.
    const ILLEGAL: Self;
    /// The `kind` tag the data files use for cells of this enumeration.
    const KIND: &'static str;

    /// The member identifier as emitted in generated source.
    fn name(&self) -> &'static str;

    /// The string key the data files use for this member. Empty for the
    /// `Illegal` sentinel.
    fn internal_name(&self) -> &'static str;

    /// Position in declared order. Damage charts are indexed by armor-type
    /// ordinal, so declared order is load-bearing for [`ArmorType`].
    fn ordinal(&self) -> usize;

    /// Looks up a member by its internal name. The sentinel's internal name
    /// is empty and empty values never reach this lookup, so `Illegal` is
    /// unreachable here.
    fn from_internal_name(value: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|v| !v.internal_name().is_empty() && v.internal_name() == value)
            .copied()
    }
}

macro_rules! game_enum {
    ($(#[$meta:meta])* $name:ident, kind: $kind:literal, { $($variant:ident => $internal:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Illegal,
        }

        impl GameEnum for $name {
            const NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [Self] = &[$(Self::$variant,)+ Self::Illegal];
            const ILLEGAL: Self = Self::Illegal;
            const KIND: &'static str = $kind;

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                    Self::Illegal => "Illegal",
                }
            }

            fn internal_name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $internal,)+
                    Self::Illegal => "",
                }
            }

            fn ordinal(&self) -> usize {
                *self as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

game_enum!(
    /// Armor classes. Declared order matches the damage charts' column order.
    ArmorType,
    kind: "preset",
    {
        Immaterial => "arm_unarmored",
        Swift => "arm_light",
        Natural => "arm_medium",
        Arcane => "arm_heavy",
        Fortified => "arm_fortified",
    }
);

game_enum!(
    /// Attack damage types, one damage chart each.
    AttackType,
    kind: "preset",
    {
        Pierce => "atk_pierce",
        Impact => "atk_normal",
        Magic => "atk_magic",
        Siege => "atk_siege",
        Pure => "atk_chaos",
    }
);

game_enum!(
    AttackMode,
    kind: "preset",
    {
        None => "atkmode_none",
        Melee => "atkmode_melee",
        Ranged => "atkmode_ranged",
    }
);

game_enum!(
    UnitClass,
    kind: "preset",
    {
        // "ai_figher" is misspelled in the game's own data files.
        Fighter => "ai_figher",
        Creature => "ai_creature",
        Mercenary => "ai_attacker",
        None => "ai_none",
        King => "ai_king",
        Worker => "ai_worker",
    }
);

game_enum!(
    Legion,
    kind: "legion_id",
    {
        Element => "element_legion_id",
        Mech => "mech_legion_id",
        Grove => "grove_legion_id",
        Forsaken => "forsaken_legion_id",
        Creature => "creature_legion_id",
        Nether => "nether_legion_id",
        Aspect => "aspect_legion_id",
    }
);

/// An ordered sequence of decimals, stored comma-separated in the data files.
///
/// The damage charts are `DecimalArray`s indexed positionally by armor-type
/// ordinal; the type itself does not enforce a length.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalArray(pub Vec<f64>);

impl DecimalArray {
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for DecimalArray {
    type Err = std::num::ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map(DecimalArray)
    }
}

impl fmt::Display for DecimalArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(&decimal_to_string(*value))?;
        }
        Ok(())
    }
}

/// Renders a decimal so that whole numbers keep their decimal point
/// (`2.0`, not `2`), matching the data files' own notation and keeping
/// emitted literals typed as doubles.
pub fn decimal_to_string(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// An unresolved reference to a [`UnitDef`] by identifier.
///
/// References stay raw through the whole load; consumers that need the
/// target build a [`UnitIndex`] and resolve in bulk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitRef(pub String);

impl UnitRef {
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An id-keyed index over a unit list for resolving [`UnitRef`]s.
///
/// Built once, then reused for every resolution. Must be rebuilt if the
/// backing slice changes. A miss means the data references a unit that was
/// never loaded; callers decide whether that is tolerable.
pub struct UnitIndex<'a> {
    by_id: HashMap<&'a str, &'a UnitDef>,
}

impl<'a> UnitIndex<'a> {
    pub fn new(units: &'a [UnitDef]) -> Self {
        Self {
            by_id: units.iter().map(|u| (u.id.as_str(), u)).collect(),
        }
    }

    pub fn resolve(&self, unit_ref: &UnitRef) -> Option<&'a UnitDef> {
        self.by_id.get(unit_ref.id()).copied()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn internal_name_lookup() {
        assert_eq!(
            ArmorType::from_internal_name("arm_fortified"),
            Some(ArmorType::Fortified)
        );
        assert_eq!(ArmorType::from_internal_name("arm_unknown"), None);
        assert_eq!(Legion::from_internal_name("grove_legion_id"), Some(Legion::Grove));
    }

    #[test]
    fn sentinel_never_matches() {
        // The sentinel's internal name is empty; an empty lookup must not
        // produce it.
        assert_eq!(ArmorType::from_internal_name(""), None);
        assert_eq!(UnitClass::from_internal_name(""), None);
    }

    #[test]
    fn ordinals_follow_declared_order() {
        assert_eq!(ArmorType::Immaterial.ordinal(), 0);
        assert_eq!(ArmorType::Fortified.ordinal(), 4);
        assert_eq!(ArmorType::Illegal.ordinal(), 5);
        assert_eq!(AttackType::VARIANTS.len(), 6);
    }

    #[test]
    fn decimal_array_round_trip() {
        let arr: DecimalArray = "1.5,2.0,3.25".parse().unwrap();
        assert_eq!(arr.0, vec![1.5, 2.0, 3.25]);
        assert_eq!(arr.to_string(), "1.5,2.0,3.25");
        assert!("1.5,abc".parse::<DecimalArray>().is_err());
    }
}
