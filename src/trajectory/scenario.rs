//! What-if scenario chain
//!
//! An ordered, owned list of projected stations. Each station is derived
//! from its immediate predecessor; the first from an anchor (the last real
//! survey, or the tie-in point when there are none). Every edit goes
//! through [`ScenarioChain::truncate_and_extend`], which drops the tail
//! from `index` and re-projects the supplied legs strictly in order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::projector::project;
use crate::types::{ScenarioLeg, ScenarioStation, StationGeometry};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioChain {
    stations: Vec<ScenarioStation>,
}

impl ScenarioChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from recorded legs.
    pub fn from_legs<I>(anchor: &dyn StationGeometry, legs: I, vs_azimuth: f64) -> Self
    where
        I: IntoIterator<Item = ScenarioLeg>,
    {
        let mut chain = Self::new();
        chain.truncate_and_extend(0, legs, anchor, vs_azimuth);
        chain
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[ScenarioStation] {
        &self.stations
    }

    pub fn get(&self, index: usize) -> Option<&ScenarioStation> {
        self.stations.get(index)
    }

    pub fn last(&self) -> Option<&ScenarioStation> {
        self.stations.last()
    }

    /// Recorded legs, in chain order.
    pub fn legs(&self) -> Vec<ScenarioLeg> {
        self.stations.iter().map(|s| s.leg).collect()
    }

    pub fn into_stations(self) -> Vec<ScenarioStation> {
        self.stations
    }

    /// Drop every station from `index` onward, then project `legs` one
    /// after another from the new tail (or from `anchor` if the chain is
    /// now empty).
    ///
    /// `index` past the end is clamped to the current length.
    pub fn truncate_and_extend<I>(
        &mut self,
        index: usize,
        legs: I,
        anchor: &dyn StationGeometry,
        vs_azimuth: f64,
    ) where
        I: IntoIterator<Item = ScenarioLeg>,
    {
        let index = index.min(self.stations.len());
        self.stations.truncate(index);

        for leg in legs {
            let station = match self.stations.last() {
                Some(prev) => project(prev, leg, vs_azimuth),
                None => project(anchor, leg, vs_azimuth),
            };
            self.stations.push(station);
        }

        debug!(from_index = index, len = self.stations.len(), "Scenario chain re-derived");
    }

    /// Append a leg at the end of the chain.
    pub fn push(&mut self, leg: ScenarioLeg, anchor: &dyn StationGeometry, vs_azimuth: f64) {
        let end = self.stations.len();
        self.truncate_and_extend(end, [leg], anchor, vs_azimuth);
    }

    /// Replace the leg at `index`; every later station keeps its own leg but
    /// is re-projected from the new upstream position.
    ///
    /// Returns false (chain untouched) when `index` is out of range.
    pub fn update(
        &mut self,
        index: usize,
        leg: ScenarioLeg,
        anchor: &dyn StationGeometry,
        vs_azimuth: f64,
    ) -> bool {
        if index >= self.stations.len() {
            return false;
        }
        let mut legs = self.legs().split_off(index);
        legs[0] = leg;
        self.truncate_and_extend(index, legs, anchor, vs_azimuth);
        true
    }

    /// Insert a leg before `index` (or at the end when `index == len`),
    /// re-projecting everything after it.
    ///
    /// Returns false (chain untouched) when `index > len`.
    pub fn insert(
        &mut self,
        index: usize,
        leg: ScenarioLeg,
        anchor: &dyn StationGeometry,
        vs_azimuth: f64,
    ) -> bool {
        if index > self.stations.len() {
            return false;
        }
        let tail = self.legs().split_off(index);
        let legs = std::iter::once(leg).chain(tail);
        self.truncate_and_extend(index, legs, anchor, vs_azimuth);
        true
    }

    /// Delete entry `index` and everything after it.
    pub fn truncate(&mut self, index: usize, anchor: &dyn StationGeometry, vs_azimuth: f64) {
        self.truncate_and_extend(index, std::iter::empty(), anchor, vs_azimuth);
    }

    /// Re-derive every station from a (possibly new) anchor.
    pub fn rebuild(&mut self, anchor: &dyn StationGeometry, vs_azimuth: f64) {
        let legs = self.legs();
        self.truncate_and_extend(0, legs, anchor, vs_azimuth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SurveyStation;

    fn anchor() -> SurveyStation {
        SurveyStation::new(1000.0, 30.0, 90.0).with_position(900.0, 50.0, 20.0)
    }

    fn legs() -> Vec<ScenarioLeg> {
        vec![
            ScenarioLeg::new(30.0, 32.0, 92.0),
            ScenarioLeg::new(30.0, 34.0, 94.0),
            ScenarioLeg::new(30.0, 36.0, 96.0),
            ScenarioLeg::new(30.0, 38.0, 98.0),
            ScenarioLeg::new(30.0, 40.0, 100.0),
        ]
    }

    #[test]
    fn test_chain_mds_accumulate() {
        let chain = ScenarioChain::from_legs(&anchor(), legs(), 90.0);
        let mds: Vec<f64> = chain.stations().iter().map(|s| s.md).collect();
        assert_eq!(mds, vec![1030.0, 1060.0, 1090.0, 1120.0, 1150.0]);
    }

    #[test]
    fn test_truncate_keeps_prefix() {
        let a = anchor();
        let mut chain = ScenarioChain::from_legs(&a, legs(), 90.0);
        let before = chain.stations()[..2].to_vec();

        chain.truncate(2, &a, 90.0);

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.stations(), before.as_slice());

        // A new station is derived from element 1
        chain.push(ScenarioLeg::new(30.0, 36.0, 96.0), &a, 90.0);
        let expected = project(&before[1], ScenarioLeg::new(30.0, 36.0, 96.0), 90.0);
        assert_eq!(chain.stations()[2], expected);
    }

    #[test]
    fn test_update_propagates_forward_only() {
        let a = anchor();
        let mut chain = ScenarioChain::from_legs(&a, legs(), 90.0);
        let original = chain.clone();

        assert!(chain.update(2, ScenarioLeg::new(30.0, 45.0, 96.0), &a, 90.0));

        // Upstream untouched
        assert_eq!(chain.stations()[..2], original.stations()[..2]);
        // Edited station and everything after it moved
        assert_ne!(chain.stations()[2].tvd, original.stations()[2].tvd);
        assert_ne!(chain.stations()[4].tvd, original.stations()[4].tvd);
        // Downstream keeps its own recorded legs
        assert_eq!(chain.stations()[3].leg, original.stations()[3].leg);
        assert_eq!(chain.stations()[4].leg, original.stations()[4].leg);
        // ...and is consistent with its fresh predecessor
        let expected = project(&chain.stations()[3], chain.stations()[4].leg, 90.0);
        assert_eq!(chain.stations()[4], expected);
    }

    #[test]
    fn test_update_out_of_range() {
        let a = anchor();
        let mut chain = ScenarioChain::from_legs(&a, legs(), 90.0);
        assert!(!chain.update(5, ScenarioLeg::new(30.0, 1.0, 1.0), &a, 90.0));
        assert_eq!(chain.len(), 5);
    }

    #[test]
    fn test_insert_shifts_tail() {
        let a = anchor();
        let mut chain = ScenarioChain::from_legs(&a, legs(), 90.0);
        assert!(chain.insert(1, ScenarioLeg::new(15.0, 31.0, 91.0), &a, 90.0));

        assert_eq!(chain.len(), 6);
        assert_eq!(chain.stations()[1].leg, ScenarioLeg::new(15.0, 31.0, 91.0));
        assert!((chain.stations()[5].md - 1165.0).abs() < 1e-9);
        assert!(!chain.insert(10, ScenarioLeg::new(15.0, 31.0, 91.0), &a, 90.0));
    }

    #[test]
    fn test_rebuild_follows_new_anchor() {
        let a = anchor();
        let mut chain = ScenarioChain::from_legs(&a, legs(), 90.0);

        let deeper = SurveyStation::new(1010.0, 30.0, 90.0).with_position(908.0, 50.0, 25.0);
        chain.rebuild(&deeper, 90.0);

        assert!((chain.stations()[0].md - 1040.0).abs() < 1e-9);
        assert_eq!(chain.legs(), legs());
    }
}
