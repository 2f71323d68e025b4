//! Type-checked descent through a [`Value`] tree by a sequence of object keys.
//!
//! Every step must land on an object holding the next key, otherwise the lookup
//! yields `None`. A JSON `null` that is actually present comes back from
//! [`get_value`] as `Some(&Value::Null)`; the typed getters treat it as not found.

use crate::Value;
use indexmap::IndexMap;

pub fn get_value<'a>(tree: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(tree, |node, key| node.as_object()?.get(*key))
}

pub fn get_value_mut<'a>(tree: &'a mut Value, keys: &[&str]) -> Option<&'a mut Value> {
    keys.iter()
        .try_fold(tree, |node, key| node.as_object_mut()?.get_mut(*key))
}

/// Integer at `keys`; floats and integer-looking strings don't count.
pub fn get_i64(tree: &Value, keys: &[&str]) -> Option<i64> {
    get_value(tree, keys)?.as_i64()
}

pub fn get_str<'a>(tree: &'a Value, keys: &[&str]) -> Option<&'a str> {
    get_value(tree, keys)?.as_str()
}

pub fn get_object<'a>(tree: &'a Value, keys: &[&str]) -> Option<&'a IndexMap<String, Value>> {
    get_value(tree, keys)?.as_object()
}

pub fn get_object_mut<'a>(
    tree: &'a mut Value,
    keys: &[&str],
) -> Option<&'a mut IndexMap<String, Value>> {
    get_value_mut(tree, keys)?.as_object_mut()
}

pub fn get_array<'a>(tree: &'a Value, keys: &[&str]) -> Option<&'a [Value]> {
    get_value(tree, keys)?.as_array()
}

pub fn get_array_mut<'a>(tree: &'a mut Value, keys: &[&str]) -> Option<&'a mut Vec<Value>> {
    get_value_mut(tree, keys)?.as_array_mut()
}
