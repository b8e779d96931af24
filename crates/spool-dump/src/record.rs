//! Canonical text encoding for metadata records.
//!
//! Records are compact JSON with object keys sorted, so the same value
//! always produces the same bytes. JSON has no spelling for NaN or
//! infinity and `serde_json` would quietly write them as `null`, so
//! payloads are walked once beforehand and any non-finite float is
//! rejected.

use std::error::Error;
use std::fmt;

use serde::ser::{self, Serialize, Serializer};

use crate::error::DumpError;

/// Encode `value` as the canonical text of record `record`.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use spool_dump::record::encode;
///
/// let mut params = HashMap::new();
/// params.insert("temperature", 1.5);
/// params.insert("pressure", 0.25);
/// assert_eq!(
///     encode("params.json", &params).unwrap(),
///     r#"{"pressure":0.25,"temperature":1.5}"#
/// );
///
/// assert!(encode("bad.json", &[1.0, f64::NAN]).is_err());
/// ```
pub fn encode<T: Serialize + ?Sized>(record: &str, value: &T) -> Result<String, DumpError> {
    let failed = |reason: String| DumpError::Encoding {
        record: record.to_string(),
        reason,
    };
    value
        .serialize(&mut FiniteProbe)
        .map_err(|e| failed(e.to_string()))?;
    let canonical = serde_json::to_value(value).map_err(|e| failed(e.to_string()))?;
    serde_json::to_string(&canonical).map_err(|e| failed(e.to_string()))
}

#[derive(Debug)]
struct ProbeError(String);

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ProbeError {}

impl ser::Error for ProbeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

/// Serializer that produces nothing and fails on non-finite floats.
struct FiniteProbe;

impl FiniteProbe {
    fn check(value: f64) -> Result<(), ProbeError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ProbeError(format!("non-finite number {value}")))
        }
    }
}

impl Serializer for &mut FiniteProbe {
    type Ok = ();
    type Error = ProbeError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<(), ProbeError> {
        FiniteProbe::check(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), ProbeError> {
        FiniteProbe::check(v)
    }

    fn serialize_char(self, _: char) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), ProbeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), ProbeError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<(), ProbeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<(), ProbeError> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, ProbeError> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self, ProbeError> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, ProbeError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, ProbeError> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self, ProbeError> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, ProbeError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, ProbeError> {
        Ok(self)
    }
}

impl ser::SerializeSeq for &mut FiniteProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeTuple for &mut FiniteProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for &mut FiniteProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for &mut FiniteProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeMap for &mut FiniteProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), ProbeError> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ProbeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeStruct for &mut FiniteProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), ProbeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for &mut FiniteProbe {
    type Ok = ();
    type Error = ProbeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), ProbeError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), ProbeError> {
        Ok(())
    }
}
