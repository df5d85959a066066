//! Record shapes for the three balance tables and their assembly from XML.
//!
//! Each table document's root lists repeated record elements (`unit`,
//! `wave`, `global`). A record's identifier comes from its `id` attribute;
//! every other field comes from the like-named child element's text, which
//! is a tagged cell decoded through [`crate::decode`].
//!
//! Each record shape also carries a hand-written `FIELDS` table naming its
//! fields and their semantic types in declared order. The source emitters
//! drive declaration blocks off these tables, which keeps field order and
//! type mapping testable without reflection.

use roxmltree::Node;

use crate::decode;
use crate::decode::DecodeError;
use crate::error::{Error, Result};
use crate::game_types::{
    ArmorType, AttackMode, AttackType, DecimalArray, GameEnum, Legion, UnitClass, UnitRef,
};

/// Semantic type of one record field, selecting its decoder variant and its
/// emitted declaration type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int,
    Double,
    /// Non-nullable string in the emitted declaration; an absent value
    /// still emits as an empty literal.
    Str,
    /// Nullable string; absent emits as null.
    OptStr,
    DecimalArray,
    UnitId,
    OptUnitId,
    Armor,
    Attack,
    Mode,
    Class,
    Legion,
}

/// One entry of a record shape's field table: the field name as emitted,
/// the element/attribute name in the XML, and the semantic type.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub xml: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, xml: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, xml, ty }
}

/// One tower, creature, or mercenary definition from `units.xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    pub id: String,
    pub legion: Option<Legion>,
    pub unit_class: Option<UnitClass>,
    pub attack_speed: f64,
    pub armor_type: Option<ArmorType>,
    pub attack_mode: Option<AttackMode>,
    pub attack_type: Option<AttackType>,
    pub dmg_base: i32,
    pub dmg_spread: i32,
    pub defense_base: i32,
    pub gold_bounty: i32,
    pub gold_cost: i32,
    pub hitpoints: i32,
    pub hitpoints_regen: f64,
    pub mana: i32,
    pub mana_regen: f64,
    pub mythium_cost: i32,
    pub splash_path: Option<String>,
    pub upgrades_from: Option<String>,
    pub total_value: i32,
    pub total_food: i32,
    pub income_bonus: i32,
}

impl UnitDef {
    pub const TAG: &'static str = "unit";

    pub const FIELDS: &'static [FieldSpec] = &[
        field("id", "id", FieldType::Str),
        field("legion", "legion", FieldType::Legion),
        field("unitClass", "unitclass", FieldType::Class),
        field("attackSpeed", "aspd", FieldType::Double),
        field("armorType", "armortype", FieldType::Armor),
        field("attackMode", "attackmode", FieldType::Mode),
        field("attackType", "attacktype", FieldType::Attack),
        field("dmgBase", "dmgbase", FieldType::Int),
        field("dmgSpread", "dmgspread", FieldType::Int),
        field("defenseBase", "defensebase", FieldType::Int),
        field("goldBounty", "goldbounty", FieldType::Int),
        field("goldCost", "goldcost", FieldType::Int),
        field("hitpoints", "hp", FieldType::Int),
        field("hitpointsRegen", "hpregen", FieldType::Double),
        field("mana", "mp", FieldType::Int),
        field("manaRegen", "mpregen", FieldType::Double),
        field("mythiumCost", "mythiumcost", FieldType::Int),
        field("splashPath", "splashpath", FieldType::Str),
        field("upgradesFrom", "upgradesfrom", FieldType::OptStr),
        field("totalValue", "totalvalue", FieldType::Int),
        field("totalFood", "totalfood", FieldType::Int),
        field("incomeBonus", "incomebonus", FieldType::Int),
    ];

    pub fn from_node(node: Node<'_, '_>) -> Result<Self> {
        let cells = RecordCells::new("UnitDef", node)?;
        Ok(Self {
            id: cells.id.clone(),
            legion: cells.opt_enum::<Legion>("legion"),
            unit_class: cells.opt_enum::<UnitClass>("unitclass"),
            attack_speed: cells.require_f64("aspd")?,
            armor_type: cells.opt_enum::<ArmorType>("armortype"),
            attack_mode: cells.opt_enum::<AttackMode>("attackmode"),
            attack_type: cells.opt_enum::<AttackType>("attacktype"),
            dmg_base: cells.require_i32("dmgbase")?,
            dmg_spread: cells.require_i32("dmgspread")?,
            defense_base: cells.require_i32("defensebase")?,
            gold_bounty: cells.require_i32("goldbounty")?,
            gold_cost: cells.require_i32("goldcost")?,
            hitpoints: cells.require_i32("hp")?,
            hitpoints_regen: cells.require_f64("hpregen")?,
            mana: cells.require_i32("mp")?,
            mana_regen: cells.require_f64("mpregen")?,
            mythium_cost: cells.require_i32("mythiumcost")?,
            splash_path: cells.opt_string("splashpath"),
            upgrades_from: cells.opt_string("upgradesfrom"),
            total_value: cells.require_i32("totalvalue")?,
            total_food: cells.require_i32("totalfood")?,
            income_bonus: cells.require_i32("incomebonus")?,
        })
    }
}

/// One enemy wave definition from `waves.xml`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveDef {
    pub id: String,
    pub amount: i32,
    pub amount2: i32,
    pub prepare_time: i32,
    pub recommended_value: i32,
    pub unit: UnitRef,
    pub unit2: Option<UnitRef>,
    pub level_num: i32,
    pub total_reward: i32,
}

impl WaveDef {
    pub const TAG: &'static str = "wave";

    pub const FIELDS: &'static [FieldSpec] = &[
        field("id", "id", FieldType::Str),
        field("amount", "amount", FieldType::Int),
        field("amount2", "amount2", FieldType::Int),
        field("prepareTime", "preparetime", FieldType::Int),
        field("recommendedValue", "recommendedvalue", FieldType::Int),
        field("unit", "unit", FieldType::UnitId),
        field("unit2", "spellunit2", FieldType::OptUnitId),
        field("levelNum", "levelnum", FieldType::Int),
        field("totalReward", "totalreward", FieldType::Int),
    ];

    pub fn from_node(node: Node<'_, '_>) -> Result<Self> {
        let cells = RecordCells::new("WaveDef", node)?;
        Ok(Self {
            id: cells.id.clone(),
            amount: cells.require_i32("amount")?,
            amount2: cells.require_i32("amount2")?,
            prepare_time: cells.require_i32("preparetime")?,
            recommended_value: cells.require_i32("recommendedvalue")?,
            unit: cells.require_unit_ref("unit")?,
            unit2: cells.opt_unit_ref("spellunit2"),
            level_num: cells.require_i32("levelnum")?,
            total_reward: cells.require_i32("totalreward")?,
        })
    }
}

/// The singleton balance record from `globals.xml`: one damage chart per
/// attack type (indexed by armor-type ordinal) and starting resources.
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub id: String,
    pub attack_chaos: DecimalArray,
    pub attack_magic: DecimalArray,
    pub attack_normal: DecimalArray,
    pub attack_pierce: DecimalArray,
    pub attack_siege: DecimalArray,
    pub starting_gold: i32,
    pub starting_mythium: i32,
}

impl Global {
    pub const TAG: &'static str = "global";

    pub const FIELDS: &'static [FieldSpec] = &[
        field("id", "id", FieldType::Str),
        field("attackChaos", "attackchartchaos", FieldType::DecimalArray),
        field("attackMagic", "attackchartmagic", FieldType::DecimalArray),
        field("attackNormal", "attackchartnormal", FieldType::DecimalArray),
        field("attackPierce", "attackchartpierce", FieldType::DecimalArray),
        field("attackSiege", "attackchartsiege", FieldType::DecimalArray),
        field("startingGold", "startinggold", FieldType::Int),
        field("startingMythium", "startingmythium", FieldType::Int),
    ];

    pub fn from_node(node: Node<'_, '_>) -> Result<Self> {
        let cells = RecordCells::new("Global", node)?;
        Ok(Self {
            id: cells.id.clone(),
            attack_chaos: cells.require_decimal_array("attackchartchaos")?,
            attack_magic: cells.require_decimal_array("attackchartmagic")?,
            attack_normal: cells.require_decimal_array("attackchartnormal")?,
            attack_pierce: cells.require_decimal_array("attackchartpierce")?,
            attack_siege: cells.require_decimal_array("attackchartsiege")?,
            starting_gold: cells.require_i32("startinggold")?,
            starting_mythium: cells.require_i32("startingmythium")?,
        })
    }

    /// The damage multiplier the given attack type deals against the given
    /// armor type. `None` if the chart is shorter than the armor ordinal or
    /// either side is the `Illegal` sentinel.
    pub fn modifier(&self, attack: AttackType, armor: ArmorType) -> Option<f64> {
        let chart = match attack {
            AttackType::Pierce => &self.attack_pierce,
            AttackType::Impact => &self.attack_normal,
            AttackType::Magic => &self.attack_magic,
            AttackType::Siege => &self.attack_siege,
            AttackType::Pure => &self.attack_chaos,
            AttackType::Illegal => return None,
        };
        if armor == ArmorType::Illegal {
            return None;
        }
        chart.get(armor.ordinal())
    }
}

/// Field-cell access for one record element, carrying the record name and
/// id for error context.
struct RecordCells<'a, 'input> {
    record: &'static str,
    id: String,
    node: Node<'a, 'input>,
}

impl<'a, 'input> RecordCells<'a, 'input> {
    /// The identifier is required on every record shape; an element without
    /// one cannot be reported on, looked up, or resolved against.
    fn new(record: &'static str, node: Node<'a, 'input>) -> Result<Self> {
        let id = node.attribute("id").ok_or(Error::MissingField {
            record,
            id: String::new(),
            field: "id",
        })?;
        Ok(RecordCells {
            record,
            id: id.to_owned(),
            node,
        })
    }

    /// The raw cell for a field: the like-named child element's text.
    /// A missing element or empty text is the same as "no value".
    fn cell(&self, name: &str) -> Option<&'a str> {
        self.node
            .children()
            .find(|c| c.has_tag_name(name))
            .and_then(|c| c.text())
            .filter(|t| !t.trim().is_empty())
    }

    fn decode_err(&self, field: &'static str, err: DecodeError) -> Error {
        Error::Decode {
            record: self.record,
            id: self.id.clone(),
            field,
            err,
        }
    }

    fn missing(&self, field: &'static str) -> Error {
        Error::MissingField {
            record: self.record,
            id: self.id.clone(),
            field,
        }
    }

    fn require_i32(&self, field: &'static str) -> Result<i32> {
        self.cell(field)
            .map(decode::decode_i32)
            .transpose()
            .map_err(|err| self.decode_err(field, err))?
            .flatten()
            .ok_or_else(|| self.missing(field))
    }

    fn require_f64(&self, field: &'static str) -> Result<f64> {
        self.cell(field)
            .map(decode::decode_f64)
            .transpose()
            .map_err(|err| self.decode_err(field, err))?
            .flatten()
            .ok_or_else(|| self.missing(field))
    }

    fn require_decimal_array(&self, field: &'static str) -> Result<DecimalArray> {
        self.cell(field)
            .map(decode::decode_decimal_array)
            .transpose()
            .map_err(|err| self.decode_err(field, err))?
            .flatten()
            .ok_or_else(|| self.missing(field))
    }

    fn require_unit_ref(&self, field: &'static str) -> Result<UnitRef> {
        self.opt_unit_ref(field).ok_or_else(|| self.missing(field))
    }

    fn opt_unit_ref(&self, field: &str) -> Option<UnitRef> {
        self.cell(field).and_then(decode::decode_unit_ref)
    }

    fn opt_string(&self, field: &str) -> Option<String> {
        self.cell(field).and_then(decode::decode_string)
    }

    fn opt_enum<E: GameEnum>(&self, field: &str) -> Option<E> {
        self.cell(field).and_then(decode::decode_enum::<E>)
    }
}
