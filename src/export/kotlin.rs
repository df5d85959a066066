//! Emits a loaded dataset as Kotlin source: the enumeration declarations,
//! the record class declarations, and literal collections for every unit,
//! every wave, and the global balance record.
//!
//! Unit literals keep load order; wave literals are sorted ascending by
//! level number (stable, so waves sharing a level keep their load order).
//! Enum fields that carried no decodable value are emitted as the
//! enumeration's `Illegal` sentinel -- this is the only place the "no
//! value" state is conflated with "recognized as invalid".

use std::io::{self, Write};

use itertools::Itertools;

use crate::defs::{FieldSpec, FieldType, Global, UnitDef, WaveDef};
use crate::game_data::GameData;
use crate::game_types::{
    ArmorType, AttackMode, AttackType, DecimalArray, GameEnum, Legion, UnitClass, UnitRef,
    decimal_to_string,
};

/// Writes the complete generated source for a dataset.
pub fn write_defs<W: Write>(out: &mut W, data: &GameData) -> io::Result<()> {
    write_enum::<ArmorType, W>(out)?;
    write_enum::<AttackType, W>(out)?;
    write_enum::<AttackMode, W>(out)?;
    write_enum::<UnitClass, W>(out)?;
    write_enum::<Legion, W>(out)?;

    write_class_def(out, "UnitDef", UnitDef::FIELDS)?;
    write_class_def(out, "WaveDef", WaveDef::FIELDS)?;
    write_class_def(out, "Global", Global::FIELDS)?;

    writeln!(out, "val units = listOf(")?;
    writeln!(
        out,
        "{}",
        data.units.iter().map(unit_literal).join(",\n")
    )?;
    writeln!(out, ")")?;

    // Stable sort: waves sharing a level number keep their load order.
    let mut waves: Vec<&WaveDef> = data.waves.iter().collect();
    waves.sort_by_key(|w| w.level_num);

    writeln!(out, "val waves = listOf(")?;
    writeln!(
        out,
        "{}",
        waves.iter().map(|w| wave_literal(w)).join(",\n")
    )?;
    writeln!(out, ")")?;

    writeln!(out, "val global = {}", global_literal(&data.global))?;
    Ok(())
}

fn write_enum<E: GameEnum, W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "enum class {} {{", E::NAME)?;
    writeln!(
        out,
        "{}",
        E::VARIANTS.iter().map(|v| format!("\t{}", v.name())).join(",\n")
    )?;
    writeln!(out, "}}")
}

fn write_class_def(out: &mut impl Write, name: &str, fields: &[FieldSpec]) -> io::Result<()> {
    writeln!(out, "data class {name}(")?;
    writeln!(
        out,
        "{}",
        fields
            .iter()
            .map(|f| format!("\tval {} : {}", f.name, kotlin_type(f.ty)))
            .join(",\n")
    )?;
    writeln!(out, ")")
}

fn kotlin_type(ty: FieldType) -> &'static str {
    match ty {
        FieldType::Int => "Int",
        FieldType::Double => "Double",
        FieldType::Str => "String",
        FieldType::OptStr => "String?",
        FieldType::DecimalArray => "List<Double>",
        // Unit references are plain identifier strings in the emitted form.
        FieldType::UnitId => "String",
        FieldType::OptUnitId => "String?",
        FieldType::Armor => "ArmorType",
        FieldType::Attack => "AttackType",
        FieldType::Mode => "AttackMode",
        FieldType::Class => "UnitClass",
        FieldType::Legion => "Legion",
    }
}

fn quoted(value: &str) -> String {
    format!("\"{value}\"")
}

/// A non-nullable string slot: an absent value still has to produce a
/// string literal, so it emits empty.
fn string_value(value: Option<&str>) -> String {
    quoted(value.unwrap_or(""))
}

/// A nullable string slot: absent emits null.
fn opt_string_value(value: Option<&str>) -> String {
    value.map_or_else(|| "null".to_owned(), quoted)
}

/// An enum slot: absent or unrecognized values emit the sentinel.
fn enum_value<E: GameEnum>(value: Option<E>) -> String {
    let member = value.unwrap_or(E::ILLEGAL);
    format!("{}.{}", E::NAME, member.name())
}

fn decimal_array_value(value: &DecimalArray) -> String {
    format!("listOf({value})")
}

fn unit_ref_value(value: &UnitRef) -> String {
    quoted(value.id())
}

fn unit_literal(unit: &UnitDef) -> String {
    format!(
        "UnitDef({})",
        [
            quoted(&unit.id),
            enum_value(unit.legion),
            enum_value(unit.unit_class),
            decimal_to_string(unit.attack_speed),
            enum_value(unit.armor_type),
            enum_value(unit.attack_mode),
            enum_value(unit.attack_type),
            unit.dmg_base.to_string(),
            unit.dmg_spread.to_string(),
            unit.defense_base.to_string(),
            unit.gold_bounty.to_string(),
            unit.gold_cost.to_string(),
            unit.hitpoints.to_string(),
            decimal_to_string(unit.hitpoints_regen),
            unit.mana.to_string(),
            decimal_to_string(unit.mana_regen),
            unit.mythium_cost.to_string(),
            string_value(unit.splash_path.as_deref()),
            opt_string_value(unit.upgrades_from.as_deref()),
            unit.total_value.to_string(),
            unit.total_food.to_string(),
            unit.income_bonus.to_string(),
        ]
        .join(", ")
    )
}

fn wave_literal(wave: &WaveDef) -> String {
    format!(
        "WaveDef({})",
        [
            quoted(&wave.id),
            wave.amount.to_string(),
            wave.amount2.to_string(),
            wave.prepare_time.to_string(),
            wave.recommended_value.to_string(),
            unit_ref_value(&wave.unit),
            opt_string_value(wave.unit2.as_ref().map(UnitRef::id)),
            wave.level_num.to_string(),
            wave.total_reward.to_string(),
        ]
        .join(", ")
    )
}

fn global_literal(global: &Global) -> String {
    format!(
        "Global({})",
        [
            quoted(&global.id),
            decimal_array_value(&global.attack_chaos),
            decimal_array_value(&global.attack_magic),
            decimal_array_value(&global.attack_normal),
            decimal_array_value(&global.attack_pierce),
            decimal_array_value(&global.attack_siege),
            global.starting_gold.to_string(),
            global.starting_mythium.to_string(),
        ]
        .join(", ")
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game_types::{ArmorType, AttackMode, AttackType, DecimalArray, Legion, UnitClass};

    fn sample_unit(id: &str) -> UnitDef {
        UnitDef {
            id: id.to_owned(),
            legion: Some(Legion::Element),
            unit_class: Some(UnitClass::Fighter),
            attack_speed: 0.95,
            armor_type: Some(ArmorType::Swift),
            attack_mode: Some(AttackMode::Ranged),
            attack_type: Some(AttackType::Magic),
            dmg_base: 52,
            dmg_spread: 4,
            defense_base: 0,
            gold_bounty: 0,
            gold_cost: 235,
            hitpoints: 980,
            hitpoints_regen: 0.5,
            mana: 0,
            mana_regen: 0.0,
            mythium_cost: 0,
            splash_path: Some("Splashes/Tempest.png".to_owned()),
            upgrades_from: None,
            total_value: 235,
            total_food: 3,
            income_bonus: 0,
        }
    }

    fn sample_wave(id: &str, level_num: i32) -> WaveDef {
        WaveDef {
            id: id.to_owned(),
            amount: 20,
            amount2: 0,
            prepare_time: 25,
            recommended_value: 70,
            unit: UnitRef("crab_unit_id".to_owned()),
            unit2: None,
            level_num,
            total_reward: 72,
        }
    }

    fn sample_global() -> Global {
        Global {
            id: "global".to_owned(),
            attack_chaos: DecimalArray(vec![1.0, 1.0, 1.0, 1.0, 1.0]),
            attack_magic: DecimalArray(vec![1.0, 0.75, 1.0, 1.25, 1.0]),
            attack_normal: DecimalArray(vec![1.0, 1.0, 1.25, 0.75, 1.0]),
            attack_pierce: DecimalArray(vec![1.0, 1.25, 0.75, 1.0, 0.65]),
            attack_siege: DecimalArray(vec![1.0, 1.0, 1.0, 1.0, 1.5]),
            starting_gold: 250,
            starting_mythium: 0,
        }
    }

    fn render(data: &GameData) -> String {
        let mut out = Vec::new();
        write_defs(&mut out, data).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn enum_declarations_list_members_in_order() {
        let data = GameData {
            units: vec![],
            global: sample_global(),
            waves: vec![],
        };
        let source = render(&data);
        let armor_at = source.find("enum class ArmorType {").unwrap();
        let body = &source[armor_at..source[armor_at..].find('}').unwrap() + armor_at];
        assert!(body.contains("\tImmaterial,\n\tSwift,\n\tNatural,\n\tArcane,\n\tFortified,\n\tIllegal"));
        assert!(source.contains("enum class Legion {"));
    }

    #[test]
    fn class_declarations_follow_field_tables() {
        let data = GameData {
            units: vec![],
            global: sample_global(),
            waves: vec![],
        };
        let source = render(&data);
        assert!(source.contains("data class UnitDef("));
        assert!(source.contains("\tval attackSpeed : Double"));
        assert!(source.contains("\tval upgradesFrom : String?"));
        assert!(source.contains("\tval attackChaos : List<Double>"));
        assert!(source.contains("\tval unit2 : String?"));
    }

    #[test]
    fn unit_literal_formats_fields() {
        let lit = unit_literal(&sample_unit("tempest_unit_id"));
        assert_eq!(
            lit,
            "UnitDef(\"tempest_unit_id\", Legion.Element, UnitClass.Fighter, 0.95, \
             ArmorType.Swift, AttackMode.Ranged, AttackType.Magic, 52, 4, 0, 0, 235, \
             980, 0.5, 0, 0.0, 0, \"Splashes/Tempest.png\", null, 235, 3, 0)"
        );
    }

    #[test]
    fn absent_enum_emits_sentinel() {
        let mut unit = sample_unit("u");
        unit.armor_type = None;
        assert!(unit_literal(&unit).contains("ArmorType.Illegal"));
    }

    #[test]
    fn absent_required_string_emits_empty_literal() {
        let mut unit = sample_unit("u");
        unit.splash_path = None;
        assert!(unit_literal(&unit).contains(", \"\", null,"));
    }

    #[test]
    fn decimal_arrays_emit_with_decimal_points() {
        assert_eq!(
            decimal_array_value(&DecimalArray(vec![1.5, 2.0, 3.25])),
            "listOf(1.5,2.0,3.25)"
        );
    }

    #[test]
    fn waves_sorted_by_level_stable() {
        let mut w_a = sample_wave("third", 3);
        w_a.total_reward = 1;
        let w_b = sample_wave("first", 1);
        let w_c = sample_wave("second_a", 2);
        let mut w_d = sample_wave("second_b", 2);
        w_d.total_reward = 2;

        let data = GameData {
            units: vec![],
            global: sample_global(),
            waves: vec![w_a, w_b, w_c, w_d],
        };
        let source = render(&data);
        let order: Vec<usize> = ["\"first\"", "\"second_a\"", "\"second_b\"", "\"third\""]
            .iter()
            .map(|id| source.find(id).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn global_literal_round_trips_charts() {
        let lit = global_literal(&sample_global());
        assert!(lit.starts_with("Global(\"global\", listOf(1.0,1.0,1.0,1.0,1.0), "));
        assert!(lit.contains("listOf(1.0,1.25,0.75,1.0,0.65)"));
        assert!(lit.ends_with(", 250, 0)"));
    }

    #[test]
    fn end_to_end_literal_counts() {
        let data = GameData {
            units: vec![sample_unit("u1")],
            global: sample_global(),
            waves: vec![sample_wave("wave_01", 1)],
        };
        let source = render(&data);
        assert_eq!(source.matches("UnitDef(\"").count(), 1);
        assert_eq!(source.matches("WaveDef(\"").count(), 1);
        assert_eq!(source.matches("val global = Global(").count(), 1);
        assert!(source.contains("ArmorType.Swift"));
    }
}
