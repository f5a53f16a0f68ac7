use std::{collections::HashMap, hash::Hash, rc::Rc};

use serde::Serialize;

use crate::{
    property::error::PropertyError,
    types::ObserverId,
    wire::{to_wire, WireValue},
};

type EqFn<T> = Rc<dyn Fn(&T, &T) -> bool>;
type SerFn<T> = Rc<dyn Fn(&T, Option<ObserverId>) -> Result<WireValue, PropertyError>>;
type DupFn<T> = Rc<dyn Fn(&T) -> T>;

/// Pluggable per-type behavior for a replicated value, supplied at property
/// construction:
///
/// - `eq` decides whether a write is a no-op,
/// - `ser` converts a value to its wire representation, optionally
///   customized per observer (`None` means the broadcast/canonical context),
/// - `dup` produces the snapshot copy captured when an observer's private
///   branch is established. For reference-like values (lists, maps) this
///   must be a deep copy so the branch never aliases the canonical
///   container.
#[derive(Clone)]
pub struct ValueStrategy<T> {
    eq: EqFn<T>,
    ser: SerFn<T>,
    dup: DupFn<T>,
}

impl<T> ValueStrategy<T> {
    pub fn new(
        eq: impl Fn(&T, &T) -> bool + 'static,
        ser: impl Fn(&T, Option<ObserverId>) -> Result<WireValue, PropertyError> + 'static,
        dup: impl Fn(&T) -> T + 'static,
    ) -> Self {
        Self {
            eq: Rc::new(eq),
            ser: Rc::new(ser),
            dup: Rc::new(dup),
        }
    }

    pub(crate) fn values_equal(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }

    pub(crate) fn serialize(
        &self,
        value: &T,
        observer: Option<ObserverId>,
    ) -> Result<WireValue, PropertyError> {
        (self.ser)(value, observer)
    }

    pub(crate) fn duplicate(&self, value: &T) -> T {
        (self.dup)(value)
    }
}

impl<T: Clone + PartialEq + Serialize + 'static> ValueStrategy<T> {
    /// Native equality, serde wire conversion, `clone` duplication.
    pub fn standard() -> Self {
        Self::new(
            |a: &T, b: &T| a == b,
            |value: &T, _observer| to_wire(value),
            |value: &T| value.clone(),
        )
    }
}

impl<T: 'static> ValueStrategy<T> {
    /// Derive a whole-list strategy from this element strategy: lists are
    /// equal iff same length and pairwise element-equal; serialization and
    /// duplication are element-wise.
    pub fn for_list(&self) -> ValueStrategy<Vec<T>> {
        let eq = self.eq.clone();
        let ser = self.ser.clone();
        let dup = self.dup.clone();
        ValueStrategy::new(
            move |a: &Vec<T>, b: &Vec<T>| {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| eq(x, y))
            },
            move |list: &Vec<T>, observer| {
                let elements = list
                    .iter()
                    .map(|value| ser(value, observer))
                    .collect::<Result<Vec<WireValue>, PropertyError>>()?;
                Ok(WireValue::Array(elements))
            },
            move |list: &Vec<T>| list.iter().map(|value| dup(value)).collect(),
        )
    }

    /// Derive a whole-map strategy from this value strategy: maps are equal
    /// iff they have the same key set and every value compares equal under
    /// the element equality, regardless of insertion order. Keys use native
    /// map equality.
    ///
    /// Wire form is an array of `[key, value]` pairs: keys are arbitrary
    /// `Serialize` types, which JSON objects cannot hold.
    pub fn for_map<K>(&self) -> ValueStrategy<HashMap<K, T>>
    where
        K: Eq + Hash + Clone + Serialize + 'static,
    {
        let eq = self.eq.clone();
        let ser = self.ser.clone();
        let dup = self.dup.clone();
        ValueStrategy::new(
            move |a: &HashMap<K, T>, b: &HashMap<K, T>| {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| b.get(key).is_some_and(|other| eq(value, other)))
            },
            move |map: &HashMap<K, T>, observer| {
                let entries = map
                    .iter()
                    .map(|(key, value)| {
                        Ok(WireValue::Array(vec![to_wire(key)?, ser(value, observer)?]))
                    })
                    .collect::<Result<Vec<WireValue>, PropertyError>>()?;
                Ok(WireValue::Array(entries))
            },
            move |map: &HashMap<K, T>| {
                map.iter()
                    .map(|(key, value)| (key.clone(), dup(value)))
                    .collect()
            },
        )
    }
}
