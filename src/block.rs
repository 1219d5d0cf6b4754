//! The typed block / sub-block tree attached to a frame.

use crate::error::EdrError;
use crate::reader::XdrReader;

/// Element type tag for a [`SubBlock`]'s values.
///
/// A tagged sum, not run-time reflection: every sub-block declares its
/// element type on disk as an `i32` code, and that code selects one of
/// these six variants up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Int32,
    Float32,
    Float64,
    Int64,
    Char,
    String,
}

impl ElementType {
    /// Maps an on-disk sub-block type code to an [`ElementType`].
    pub(crate) fn from_code(code: i32) -> Result<Self, EdrError> {
        match code {
            0 => Ok(ElementType::Int32),
            1 => Ok(ElementType::Float32),
            2 => Ok(ElementType::Float64),
            3 => Ok(ElementType::Int64),
            4 => Ok(ElementType::Char),
            5 => Ok(ElementType::String),
            other => Err(EdrError::UnknownBlockType { type_code: other }),
        }
    }

    /// The element type assumed for sub-blocks synthesized for a
    /// pre-v4 distance-restraint block, which carries no type code of
    /// its own on disk: the native real for the file's precision.
    pub(crate) fn native(double_mode: bool) -> Self {
        if double_mode {
            ElementType::Float64
        } else {
            ElementType::Float32
        }
    }
}

/// One homogeneous value out of a [`SubBlock`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int32(i32),
    Float32(f32),
    Float64(f64),
    Int64(i64),
    Char(i32),
    String(String),
}

/// A typed, homogeneous array nested inside a [`Block`].
#[derive(Debug, Clone)]
pub struct SubBlock {
    pub element_type: ElementType,
    pub nr: i32,
    pub values: Vec<Value>,
}

/// A tagged per-frame auxiliary container: orientation restraint,
/// distance restraint, free-energy collection, BAR histogram, BAR
/// raw, or any block id this implementation doesn't know the meaning
/// of — the id is opaque data, not dispatched on.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: i32,
    pub sub_blocks: Vec<SubBlock>,
}

/// Declared shape of one sub-block, read during the frame header:
/// element type and length, payload deferred to the frame-payload read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SubBlockDescriptor {
    pub(crate) element_type: ElementType,
    pub(crate) nr: i32,
}

/// Declared shape of one block: its id and sub-block descriptors.
#[derive(Debug, Clone)]
pub(crate) struct BlockDescriptor {
    pub(crate) id: i32,
    pub(crate) sub_blocks: Vec<SubBlockDescriptor>,
}

/// Reads `nr` values of `element_type` from `r`.
pub(crate) fn read_sub_block(
    r: &mut XdrReader,
    element_type: ElementType,
    nr: i32,
) -> Result<SubBlock, EdrError> {
    let mut values = Vec::with_capacity(nr.max(0) as usize);
    for _ in 0..nr {
        let value = match element_type {
            ElementType::Int32 => Value::Int32(r.read_i32()?),
            ElementType::Float32 => Value::Float32(r.read_f32()?),
            ElementType::Float64 => Value::Float64(r.read_f64()?),
            ElementType::Int64 => Value::Int64(r.read_i64()?),
            ElementType::Char => Value::Char(r.read_i32()?),
            ElementType::String => Value::String(r.read_string()?),
        };
        values.push(value);
    }
    Ok(SubBlock { element_type, nr, values })
}
