//! Structural equality (`equal?`)
//!
//! Unlike `Value`'s own `PartialEq`, which is identity, `equal?` descends into
//! pairs, vectors and strings. Pairs of nodes already under comparison are
//! assumed equal, which keeps the comparison finite on cyclic data.

use std::cmp::Ordering;

use hashbrown::HashSet;

use super::heap::{Handle, Heap, HeapObject};
use super::runtime_value::Value;

impl Heap {
    /// Structural equality
    pub fn equal(
        &self,
        a: Value,
        b: Value,
    ) -> bool {
        let mut assumed = HashSet::new();
        self.equal_rec(a, b, &mut assumed)
    }

    fn equal_rec(
        &self,
        mut a: Value,
        mut b: Value,
        assumed: &mut HashSet<(Handle, Handle)>,
    ) -> bool {
        loop {
            if a == b {
                return true;
            }
            let (ha, hb) = match (a, b) {
                (Value::Heap(ha), Value::Heap(hb)) => (ha, hb),
                _ => return false,
            };
            let (oa, ob) = match (self.get(ha), self.get(hb)) {
                (Some(oa), Some(ob)) => (oa, ob),
                _ => return false,
            };
            if oa.is_trackable() && !assumed.insert((ha, hb)) {
                return true;
            }
            match (oa, ob) {
                (
                    HeapObject::Pair { car: ca, cdr: da },
                    HeapObject::Pair { car: cb, cdr: db },
                ) => {
                    if !self.equal_rec(*ca, *cb, assumed) {
                        return false;
                    }
                    a = *da;
                    b = *db;
                }
                (HeapObject::Vector(va), HeapObject::Vector(vb)) => {
                    return va.len() == vb.len()
                        && va
                            .iter()
                            .zip(vb.iter())
                            .all(|(x, y)| self.equal_rec(*x, *y, assumed));
                }
                (HeapObject::String(sa), HeapObject::String(sb)) => {
                    return sa.as_bytes() == sb.as_bytes();
                }
                (HeapObject::Number(na), HeapObject::Number(nb)) => return na == nb,
                (HeapObject::Opaque(x), HeapObject::Opaque(y)) if x.class == y.class => {
                    return self
                        .classes()
                        .get(x.class)
                        .and_then(|class| class.compare())
                        .map(|compare| compare(self, a, b) == Some(Ordering::Equal))
                        .unwrap_or(false);
                }
                _ => return false,
            }
        }
    }
}
