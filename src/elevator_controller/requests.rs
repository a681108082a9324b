use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RequestKind {
    HallUp,
    HallDown,
    CabinExit,
}

impl RequestKind {
    pub const ALL: [RequestKind; 3] = [RequestKind::HallUp, RequestKind::HallDown, RequestKind::CabinExit];
}

/// The request kinds pending at one floor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestSet {
    pub hall_up: bool,
    pub hall_down: bool,
    pub cabin_exit: bool,
}

impl RequestSet {
    pub fn empty() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: RequestKind) -> &mut bool {
        match kind {
            RequestKind::HallUp => &mut self.hall_up,
            RequestKind::HallDown => &mut self.hall_down,
            RequestKind::CabinExit => &mut self.cabin_exit,
        }
    }

    pub fn insert(&mut self, kind: RequestKind) {
        *self.slot(kind) = true;
    }

    /// Returns whether `kind` was present.
    pub fn remove(&mut self, kind: RequestKind) -> bool {
        std::mem::replace(self.slot(kind), false)
    }

    pub fn contains(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::HallUp => self.hall_up,
            RequestKind::HallDown => self.hall_down,
            RequestKind::CabinExit => self.cabin_exit,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.hall_up || self.hall_down || self.cabin_exit)
    }

    pub fn union(&self, other: &RequestSet) -> RequestSet {
        RequestSet {
            hall_up: self.hall_up || other.hall_up,
            hall_down: self.hall_down || other.hall_down,
            cabin_exit: self.cabin_exit || other.cabin_exit,
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = RequestKind> + '_ {
        RequestKind::ALL.into_iter().filter(move |kind| self.contains(*kind))
    }
}

/// Pending requests for one elevator, indexed by floor `1..=num_floors`.
///
/// Floors outside the building are ignored by every operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RequestBoard {
    floors: Vec<RequestSet>,
}

impl RequestBoard {
    pub fn new(num_floors: u8) -> Self {
        Self {
            floors: vec![RequestSet::empty(); num_floors as usize],
        }
    }

    pub fn num_floors(&self) -> u8 {
        self.floors.len() as u8
    }

    pub fn contains_floor(&self, floor: u8) -> bool {
        floor >= 1 && floor <= self.num_floors()
    }

    fn index(&self, floor: u8) -> Option<usize> {
        self.contains_floor(floor).then(|| floor as usize - 1)
    }

    /// Returns false when the floor is outside the building.
    pub fn add(&mut self, floor: u8, kind: RequestKind) -> bool {
        match self.index(floor) {
            Some(index) => {
                self.floors[index].insert(kind);
                true
            }
            None => false,
        }
    }

    pub fn has(&self, floor: u8, kind: RequestKind) -> bool {
        self.at(floor).contains(kind)
    }

    pub fn has_any(&self, floors: RangeInclusive<u8>) -> bool {
        let (low, high) = floors.into_inner();
        let low = low.max(1);
        let high = high.min(self.num_floors());
        if low > high {
            return false;
        }
        self.floors[(low as usize - 1)..(high as usize)]
            .iter()
            .any(|requests| !requests.is_empty())
    }

    pub fn has_any_above(&self, floor: u8) -> bool {
        floor < u8::MAX && self.has_any((floor + 1)..=self.num_floors())
    }

    pub fn has_any_below(&self, floor: u8) -> bool {
        floor > 1 && self.has_any(1..=(floor - 1))
    }

    /// Returns whether `kind` was pending at `floor`.
    pub fn clear(&mut self, floor: u8, kind: RequestKind) -> bool {
        match self.index(floor) {
            Some(index) => self.floors[index].remove(kind),
            None => false,
        }
    }

    /// Returns what was pending at `floor`.
    pub fn clear_all(&mut self, floor: u8) -> RequestSet {
        match self.index(floor) {
            Some(index) => std::mem::take(&mut self.floors[index]),
            None => RequestSet::empty(),
        }
    }

    pub fn at(&self, floor: u8) -> RequestSet {
        self.index(floor).map(|index| self.floors[index]).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.iter().all(RequestSet::is_empty)
    }

    /// Every pending `(floor, kind)` pair, lowest floor first.
    pub fn pending(&self) -> Vec<(u8, RequestKind)> {
        self.floors
            .iter()
            .enumerate()
            .flat_map(|(index, requests)| requests.kinds().map(move |kind| (index as u8 + 1, kind)))
            .collect()
    }
}
