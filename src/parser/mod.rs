//! Rule file loader
//!
//! ```xml
//! <list enabled="true">
//!   <player classId="88,89" olyMode="NON_OLY_ONLY">
//!     <mul stat="pAtk" val="1.10"/>
//!     <targetPlayer classId="92"><add stat="pDef" val="50"/></targetPlayer>
//!     <equipedWith itemId="6364,6365"><mul stat="pAtk" val="1.05"/></equipedWith>
//!   </player>
//! </list>
//! ```
//!
//! Bad id tokens are skipped with a warning. Anything that would change the numbers a
//! rule contributes (a bad `val`, an unknown stat) fails the whole file.

mod xml_ext;

use evo_stat_mods_shared::paperdoll::equip_slot;
use evo_stat_mods_shared::{ClassId, CompetitionMode, Condition, EquippedItem, Rule, RuleRegistry};
use roxmltree::{Document, Node, ParsingOptions};
use std::{fs, path::Path};
use tracing::{debug, warn};

use crate::error::{IdKind, LoadError, ParseWarning};
use crate::host::Catalog;
use xml_ext::{NodeExt, child_elements};

/// What a rule file turned out to contain.
#[derive(Debug)]
pub enum RuleSource {
    Missing,
    Disabled,
    Rules(ParsedRules),
}

#[derive(Debug, Default)]
pub struct ParsedRules {
    pub registry: RuleRegistry,
    pub warnings: Vec<ParseWarning>,
}

pub fn read_rules(path: &Path, catalog: &dyn Catalog) -> Result<RuleSource, LoadError> {
    if !path.exists() {
        return Ok(RuleSource::Missing);
    }

    let text = fs::read_to_string(path)?;
    Ok(match parse_rules(&text, catalog)? {
        Some(parsed) => RuleSource::Rules(parsed),
        None => RuleSource::Disabled,
    })
}

/// Parse rule file markup. `None` when the file is switched off.
pub fn parse_rules(text: &str, catalog: &dyn Catalog) -> Result<Option<ParsedRules>, LoadError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;
    let root = doc.root_element();

    if !root.is_named("list") {
        return Err(LoadError::UnexpectedRoot(root.tag().to_owned()));
    }

    let enabled = root
        .attribute("enabled")
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));
    if !enabled {
        return Ok(None);
    }

    let mut parser = RuleParser::new(catalog);
    for player in child_elements(root).filter(|e| e.is_named("player")) {
        parser.player(player)?;
    }

    Ok(Some(parser.finish()))
}

struct RuleParser<'c> {
    catalog: &'c dyn Catalog,
    parsed: ParsedRules,
}

impl<'c> RuleParser<'c> {
    fn new(catalog: &'c dyn Catalog) -> Self {
        Self {
            catalog,
            parsed: ParsedRules::default(),
        }
    }

    fn finish(self) -> ParsedRules {
        self.parsed
    }

    fn player(&mut self, element: Node) -> Result<(), LoadError> {
        let Some(class_ids) = self.id_list(element, "classId", IdKind::Class) else {
            return Ok(());
        };

        let mode = match element.attribute("olyMode") {
            Some(value) => CompetitionMode::from_xml(value)
                .ok_or_else(|| LoadError::UnknownOlyMode(value.to_owned()))?,
            None => CompetitionMode::Any,
        };

        let body = self.player_body(element)?;
        for class_id in class_ids {
            for rule in &body {
                self.parsed
                    .registry
                    .push(class_id, for_class(class_id, mode, rule));
            }
        }

        Ok(())
    }

    /// Rules of one `<player>` without the class condition. Nested blocks come first,
    /// in document order, then the element's own directives.
    fn player_body(&mut self, element: Node) -> Result<Vec<Rule>, LoadError> {
        let mut rules = Vec::new();

        for child in child_elements(element) {
            if child.is_named("targetPlayer") {
                let Some(target_ids) = self.id_list(child, "classId", IdKind::TargetClass) else {
                    continue;
                };
                for target_id in target_ids {
                    directives(child, &[Condition::TargetClass(target_id)], self.catalog, &mut rules)?;
                }
            } else if child.is_named("equipedWith") {
                if let Some(condition) = self.equip_condition(child) {
                    directives(child, &[condition], self.catalog, &mut rules)?;
                }
            }
        }

        directives(element, &[], self.catalog, &mut rules)?;
        Ok(rules)
    }

    fn equip_condition(&mut self, element: Node) -> Option<Condition> {
        let item_ids = self.id_list(element, "itemId", IdKind::Item)?;
        let catalog = self.catalog;

        let items: Vec<EquippedItem> = item_ids
            .into_iter()
            .filter_map(|id| {
                let Some(template) = catalog.item_template(id) else {
                    debug!("Dropping unknown item {id} from <equipedWith>");
                    return None;
                };
                Some(EquippedItem {
                    item_id: template.item_id,
                    slot: catalog.paperdoll_index(template.body_part).map(equip_slot),
                })
            })
            .collect();

        (!items.is_empty()).then_some(Condition::Equipped(items))
    }

    /// Comma separated ids. `None` if not a single one is usable.
    fn id_list(&mut self, element: Node, attribute: &str, kind: IdKind) -> Option<Vec<ClassId>> {
        let raw = element.attribute(attribute).unwrap_or_default();
        let mut ids = Vec::new();

        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.parse() {
                Ok(id) => ids.push(id),
                Err(_) => {
                    let warning = ParseWarning::InvalidId {
                        kind,
                        token: token.to_owned(),
                        list: raw.to_owned(),
                    };
                    warn!("Stat modifiers: {warning}");
                    self.parsed.warnings.push(warning);
                }
            }
        }

        if ids.is_empty() {
            let warning = ParseWarning::NoValidIds {
                element: element.tag().to_owned(),
                kind,
            };
            warn!("Stat modifiers: {warning}");
            self.parsed.warnings.push(warning);
            return None;
        }

        Some(ids)
    }
}

fn for_class(class_id: ClassId, mode: CompetitionMode, rule: &Rule) -> Rule {
    let mut conditions = Vec::with_capacity(rule.conditions.len() + 1);
    conditions.push(Condition::SubjectClass { class_id, mode });
    conditions.extend_from_slice(&rule.conditions);
    Rule {
        conditions,
        ..rule.clone()
    }
}

/// `<mul>` and `<add>` children of `element`, each guarded by `conditions`.
fn directives(
    element: Node,
    conditions: &[Condition],
    catalog: &dyn Catalog,
    out: &mut Vec<Rule>,
) -> Result<(), LoadError> {
    for child in child_elements(element) {
        let is_mul = child.is_named("mul");
        if !is_mul && !child.is_named("add") {
            continue;
        }

        let stat = required(child, "stat")?;
        let channel = catalog
            .stat(stat)
            .ok_or_else(|| LoadError::UnknownStat(stat.to_owned()))?;
        let raw = required(child, "val")?;
        let value = parse_value(raw).ok_or_else(|| LoadError::InvalidValue {
            element: child.tag().to_owned(),
            stat: stat.to_owned(),
            value: raw.to_owned(),
        })?;

        let rule = Rule::new(channel).with_conditions(conditions);
        out.push(if is_mul { rule.mul(value) } else { rule.add(value) });
    }

    Ok(())
}

/// Decimal number, optionally with a `d`/`f` type suffix as older datapacks write them.
fn parse_value(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let digits = raw.strip_suffix(['d', 'D', 'f', 'F']).unwrap_or(raw);
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn required<'a>(element: Node<'a, '_>, attribute: &'static str) -> Result<&'a str, LoadError> {
    element
        .attribute(attribute)
        .ok_or_else(|| LoadError::MissingAttribute {
            element: element.tag().to_owned(),
            attribute,
        })
}
