//! # Canonical Serialization — JCS Byte Production
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes that feed
//! an identity hash.
//!
//! ## Security Invariant
//!
//! The inner field is private and the only constructor is
//! `CanonicalBytes::new()`. Any function that hashes must accept
//! `&CanonicalBytes`, so every digest in the ledger flows through the same
//! pipeline:
//!
//! 1. **Reject floats**: the payload's `Serialize` impl is walked once and
//!    any `f32`/`f64` is refused. Float text forms are encoder-specific, and
//!    `serde_json` silently writes NaN and infinities as `null`.
//! 2. `serde_json::to_value`: the payload's `Serialize` impl decides its
//!    logical shape. Types that cannot be represented (e.g. maps with
//!    non-string keys) fail here.
//! 3. `serde_jcs`: RFC 8785 output: lexicographically sorted keys, compact
//!    separators, UTF-8.
//!
//! Two values with the same logical content always produce identical bytes,
//! which is the property the whole chain relies on.

use serde::ser::{self, Serialize};

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with float rejection.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Object keys are sorted; separators are compact.
/// - No float numbers appear anywhere in the value tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float, including NaN and infinities. Returns
    /// `CanonicalizationError::SerializationFailed` if the value cannot be
    /// represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        obj.serialize(FloatScan).map_err(|e| match e {
            ScanError::Float(f) => CanonicalizationError::FloatRejected(f),
            ScanError::Custom(msg) => {
                CanonicalizationError::SerializationFailed(ser::Error::custom(msg))
            }
        })?;
        let value = serde_json::to_value(obj)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Float scan
// ---------------------------------------------------------------------------

/// Serializer that produces nothing and fails on the first float it meets.
///
/// Runs against the payload's own `Serialize` impl rather than a
/// `serde_json::Value`, because by the time a value tree exists NaN and
/// infinities have already become `null`.
struct FloatScan;

#[derive(Debug)]
enum ScanError {
    Float(f64),
    Custom(String),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Float(v) => write!(f, "float value {v}"),
            Self::Custom(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ScanError {}

impl ser::Error for ScanError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

type Scan = Result<(), ScanError>;

impl ser::Serializer for FloatScan {
    type Ok = ();
    type Error = ScanError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Scan {
        Ok(())
    }
    fn serialize_i8(self, _: i8) -> Scan {
        Ok(())
    }
    fn serialize_i16(self, _: i16) -> Scan {
        Ok(())
    }
    fn serialize_i32(self, _: i32) -> Scan {
        Ok(())
    }
    fn serialize_i64(self, _: i64) -> Scan {
        Ok(())
    }
    fn serialize_i128(self, _: i128) -> Scan {
        Ok(())
    }
    fn serialize_u8(self, _: u8) -> Scan {
        Ok(())
    }
    fn serialize_u16(self, _: u16) -> Scan {
        Ok(())
    }
    fn serialize_u32(self, _: u32) -> Scan {
        Ok(())
    }
    fn serialize_u64(self, _: u64) -> Scan {
        Ok(())
    }
    fn serialize_u128(self, _: u128) -> Scan {
        Ok(())
    }
    fn serialize_f32(self, v: f32) -> Scan {
        Err(ScanError::Float(f64::from(v)))
    }
    fn serialize_f64(self, v: f64) -> Scan {
        Err(ScanError::Float(v))
    }
    fn serialize_char(self, _: char) -> Scan {
        Ok(())
    }
    fn serialize_str(self, _: &str) -> Scan {
        Ok(())
    }
    fn serialize_bytes(self, _: &[u8]) -> Scan {
        Ok(())
    }
    fn serialize_none(self) -> Scan {
        Ok(())
    }
    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Scan {
        value.serialize(self)
    }
    fn serialize_unit(self) -> Scan {
        Ok(())
    }
    fn serialize_unit_struct(self, _: &'static str) -> Scan {
        Ok(())
    }
    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Scan {
        Ok(())
    }
    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        value: &T,
    ) -> Scan {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Scan {
        value.serialize(self)
    }
    fn serialize_seq(self, _: Option<usize>) -> Result<Self, ScanError> {
        Ok(self)
    }
    fn serialize_tuple(self, _: usize) -> Result<Self, ScanError> {
        Ok(self)
    }
    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, ScanError> {
        Ok(self)
    }
    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, ScanError> {
        Ok(self)
    }
    fn serialize_map(self, _: Option<usize>) -> Result<Self, ScanError> {
        Ok(self)
    }
    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, ScanError> {
        Ok(self)
    }
    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, ScanError> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FloatScan {
    type Ok = ();
    type Error = ScanError;
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Scan {
        value.serialize(FloatScan)
    }
    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeTuple for FloatScan {
    type Ok = ();
    type Error = ScanError;
    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Scan {
        value.serialize(FloatScan)
    }
    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FloatScan {
    type Ok = ();
    type Error = ScanError;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Scan {
        value.serialize(FloatScan)
    }
    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FloatScan {
    type Ok = ();
    type Error = ScanError;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Scan {
        value.serialize(FloatScan)
    }
    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeMap for FloatScan {
    type Ok = ();
    type Error = ScanError;
    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Scan {
        key.serialize(FloatScan)
    }
    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Scan {
        value.serialize(FloatScan)
    }
    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeStruct for FloatScan {
    type Ok = ();
    type Error = ScanError;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Scan {
        value.serialize(FloatScan)
    }
    fn end(self) -> Scan {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FloatScan {
    type Ok = ();
    type Error = ScanError;
    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Scan {
        value.serialize(FloatScan)
    }
    fn end(self) -> Scan {
        Ok(())
    }
}
