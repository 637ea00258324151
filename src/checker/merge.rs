use std::collections::HashMap;

use rayon::prelude::*;

use crate::{
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    types::{table::TypeTable, types::TypeId},
    Position,
};

use super::checker::{check_unit, CheckedUnit, Unit};

/// Every unit of a program, checked and merged.
#[derive(Debug, Clone)]
pub struct Program {
    /// Union of every unit's table.
    pub types: TypeTable,
    /// Per unit, maps the unit's own type ids into `types`.
    pub type_maps: Vec<Vec<TypeId>>,
    pub units: Vec<CheckedUnit>,
    /// Every unit's diagnostics plus cross unit ones, sorted by position.
    pub diagnostics: Vec<Error>,
}

impl Program {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Translates a type id of unit `unit` into the merged table.
    pub fn global_type(&self, unit: usize, id: TypeId) -> TypeId {
        self.type_maps
            .get(unit)
            .and_then(|map| map.get(id.index()))
            .copied()
            .unwrap_or(TypeId::INVALID)
    }
}

/// Checks units in parallel, then merges them in the order given.
///
/// A top level name declared by more than one unit is reported at the
/// first declaration site in each of those units, so the outcome does not
/// depend on unit order. Repeats inside a unit are already reported there.
#[tracing::instrument(level = "debug", skip_all, fields(units = units.len()))]
pub fn check_units(units: &[Unit]) -> Program {
    let checked: Vec<CheckedUnit> = units.par_iter().map(check_unit).collect();

    let mut diagnostics = Diagnostics::new();
    for unit in &checked {
        diagnostics.extend(unit.diagnostics.iter().cloned());
    }

    // Name -> first declaration site per unit
    let mut sites: HashMap<&str, Vec<(usize, Position)>> = HashMap::new();
    for (index, unit) in units.iter().enumerate() {
        for decl in &unit.decls {
            let entry = sites.entry(decl.name()).or_default();
            if !entry.iter().any(|(seen, _)| *seen == index) {
                entry.push((index, decl.get_position().clone()));
            }
        }
    }

    let mut duplicates: Vec<(&str, Position)> = sites
        .into_iter()
        .filter(|(_, sites)| sites.len() > 1)
        .flat_map(|(name, sites)| sites.into_iter().map(move |(_, position)| (name, position)))
        .collect();
    duplicates.sort_by(|a, b| a.1.cmp(&b.1));

    for (name, position) in duplicates {
        diagnostics.push(Error::new(
            ErrorImpl::DuplicateTypeName {
                name: name.to_string(),
            },
            position,
        ));
    }

    let mut types = TypeTable::new();
    let type_maps = checked.iter().map(|unit| types.absorb(&unit.types)).collect();

    let diagnostics = diagnostics.into_sorted();
    tracing::debug!(types = types.len(), errors = diagnostics.len(), "merged units");

    Program {
        types,
        type_maps,
        units: checked,
        diagnostics,
    }
}
