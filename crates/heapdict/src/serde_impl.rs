use crate::order::Compare;
use crate::HeapDict;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

// Serialized as a map in heap-array order.
impl<K: Serialize, P: Serialize, C> Serialize for HeapDict<K, P, C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut m = serializer.serialize_map(Some(self.len()))?;
        for (k, p) in self {
            m.serialize_entry(k, p)?;
        }
        m.end()
    }
}

impl<'de, K, P, C> Deserialize<'de> for HeapDict<K, P, C>
where
    K: Deserialize<'de> + Hash + Eq + Clone,
    P: Deserialize<'de>,
    C: Compare<P> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HeapDictVisitor<K, P, C>(PhantomData<fn() -> (K, P, C)>);

        impl<'de, K, P, C> Visitor<'de> for HeapDictVisitor<K, P, C>
        where
            K: Deserialize<'de> + Hash + Eq + Clone,
            P: Deserialize<'de>,
            C: Compare<P> + Default,
        {
            type Value = HeapDict<K, P, C>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default().min(4096));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                HeapDict::try_from_iter_with_order(entries, C::default()).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(HeapDictVisitor(PhantomData))
    }
}
