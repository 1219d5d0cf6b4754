//! Per-frame header and payload decoding.

use crate::block::{read_sub_block, Block, BlockDescriptor, ElementType, SubBlockDescriptor};
use crate::consts::{ENX_DISRE, ENX_VERSION, FRAME_MAGIC, LEGACY_SENTINEL};
use crate::context::FileContext;
use crate::energy::Energy;
use crate::error::EdrError;
use crate::reader::XdrReader;

/// One decoded frame: a time-stamped record of energy terms plus any
/// auxiliary blocks attached to it.
#[derive(Debug, Clone)]
pub struct Frame {
    pub t: f64,
    pub step: i64,
    pub nsum: i32,
    pub nsteps: i64,
    pub dt: f64,
    pub nre: i32,
    pub ener: Vec<Energy>,
    pub block: Vec<Block>,
    pub e_size: i32,
}

/// The declared shape of a frame, read but not yet populated with
/// energy or sub-block values.
pub(crate) struct FrameHeader {
    t: f64,
    step: i64,
    nsum: i32,
    nsteps: i64,
    dt: f64,
    nre: i32,
    block_descriptors: Vec<BlockDescriptor>,
    e_size: i32,
}

/// Sets `r.double_mode` by peeking ahead for a structural cue, then
/// restores the cursor. Must run before any other read of a frame
/// header, since its own reads are what signal normal end-of-file.
fn precision_probe(r: &mut XdrReader, ctx: &FileContext) -> Result<(), EdrError> {
    let save = r.position();
    let double_mode = if ctx.file_version >= 2 {
        r.skip(4)?;
        let probe = r.read_i32()?;
        probe != FRAME_MAGIC
    } else {
        r.skip(12)?;
        let probe = r.read_i32()?;
        probe == ctx.nre()
    };
    r.seek(save)?;
    r.double_mode = double_mode;
    Ok(())
}

/// Reads one frame header. Returns `Ok(None)` when the stream ends
/// cleanly at a frame boundary (normal end of file); any other EOF is
/// propagated as a fatal [`EdrError::Eof`].
pub(crate) fn read_frame_header(
    r: &mut XdrReader,
    ctx: &mut FileContext,
) -> Result<Option<FrameHeader>, EdrError> {
    match precision_probe(r, ctx) {
        Ok(()) => {}
        Err(EdrError::Eof) => return Ok(None),
        Err(e) => return Err(e),
    }

    let first_real = r.read_real()?;

    // `version` is this frame's own version field (or 1 in the legacy
    // branch, which carries none), not `ctx.file_version` — every
    // decision below that the original keys off "version" means the
    // value just read here, matching pyedr.py's `do_eheader`.
    let (version, t, step, mut nsum, mut nsteps, mut dt) = if first_real > LEGACY_SENTINEL {
        if ctx.file_version != 1 {
            return Err(EdrError::UnexpectedFirstReal { first_real });
        }
        let step = r.read_i32()? as i64;
        (1, first_real, step, 0, 0, 0.0)
    } else {
        let magic = r.read_i32()?;
        if magic != FRAME_MAGIC {
            return Err(EdrError::BadFrameMagic);
        }
        let version = r.read_i32()?;
        if version > ENX_VERSION {
            return Err(EdrError::UnsupportedVersion { found: version });
        }
        let t = r.read_f64()?;
        let step = r.read_i64()?;
        let nsum = r.read_i32()?;
        let nsteps = if version >= 3 { r.read_i64()? } else { nsum.max(1) as i64 };
        let dt = if version >= 5 { r.read_f64()? } else { 0.0 };
        (version, t, step, nsum, nsteps, dt)
    };

    let nre = r.read_i32()?;
    let ndisre = r.read_i32()?;
    let mut nblock = r.read_i32()?;
    if nblock < 0 {
        return Err(EdrError::CorruptFrame);
    }

    let prepend_disre = ndisre != 0;
    if prepend_disre {
        if version >= 4 {
            return Err(EdrError::OldStyleInNewFile);
        }
        nblock += 1;
    }

    if ctx.file_version == 1 && !(0.0..=crate::consts::LEGACY_MAX_TIME).contains(&t) {
        return Err(EdrError::BadLegacyHeader);
    }
    if ctx.file_version == 1 && step < 0 {
        return Err(EdrError::BadLegacyHeader);
    }

    let mut block_descriptors = Vec::with_capacity(nblock as usize);
    if prepend_disre {
        let element_type = ElementType::native(r.double_mode);
        block_descriptors.push(BlockDescriptor {
            id: ENX_DISRE,
            sub_blocks: vec![
                SubBlockDescriptor { element_type, nr: ndisre },
                SubBlockDescriptor { element_type, nr: ndisre },
            ],
        });
    }
    let remaining = nblock - block_descriptors.len() as i32;
    for index in 0..remaining {
        if version < 4 {
            let nr = r.read_i32()?;
            block_descriptors.push(BlockDescriptor {
                id: index,
                sub_blocks: vec![SubBlockDescriptor { element_type: ElementType::native(r.double_mode), nr }],
            });
        } else {
            let id = r.read_i32()?;
            let nsub = r.read_i32()?;
            let mut sub_blocks = Vec::with_capacity(nsub.max(0) as usize);
            for _ in 0..nsub {
                let type_code = r.read_i32()?;
                let nr = r.read_i32()?;
                sub_blocks.push(SubBlockDescriptor { element_type: ElementType::from_code(type_code)?, nr });
            }
            block_descriptors.push(BlockDescriptor { id, sub_blocks });
        }
    }

    let e_size = r.read_i32()?;
    r.skip(8)?; // two reserved i32 fields

    if ctx.file_version == 1 {
        ctx.legacy.fixup_header(step, &mut nsum, &mut nsteps, &mut dt);
    }

    Ok(Some(FrameHeader { t, step, nsum, nsteps, dt, nre, block_descriptors, e_size }))
}

/// Reads one frame's payload given its already-decoded header.
pub(crate) fn read_frame_payload(
    r: &mut XdrReader,
    ctx: &mut FileContext,
    header: FrameHeader,
) -> Result<Frame, EdrError> {
    let has_sub_blocks = header.block_descriptors.iter().any(|b| !b.sub_blocks.is_empty());
    if header.step < 0 || !(header.nre > 0 || has_sub_blocks) {
        return Err(EdrError::CorruptFrame);
    }

    let mut ener = Vec::with_capacity(header.nre.max(0) as usize);
    for _ in 0..header.nre {
        let e = r.read_real()?;
        let mut energy = Energy::new(e);
        if ctx.file_version == 1 || header.nsum > 0 {
            energy.eav = r.read_real()?;
            energy.esum = r.read_real()?;
            if ctx.file_version == 1 {
                r.read_real()?;
            }
        }
        ener.push(energy);
    }

    let mut nsum = header.nsum;
    if ctx.legacy_open {
        ctx.legacy.apply(header.step, &mut nsum, &mut ener);
    }

    let mut block = Vec::with_capacity(header.block_descriptors.len());
    for bd in &header.block_descriptors {
        let mut sub_blocks = Vec::with_capacity(bd.sub_blocks.len());
        for sbd in &bd.sub_blocks {
            sub_blocks.push(read_sub_block(r, sbd.element_type, sbd.nr)?);
        }
        block.push(Block { id: bd.id, sub_blocks });
    }

    Ok(Frame {
        t: header.t,
        step: header.step,
        nsum,
        nsteps: header.nsteps,
        dt: header.dt,
        nre: header.nre,
        ener,
        block,
        e_size: header.e_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::{NameTable, TermName};

    fn ctx_for(version: i32, nterms: usize) -> FileContext {
        let terms = (0..nterms)
            .map(|i| TermName { name: format!("T{i}"), unit: "kJ/mol".to_owned() })
            .collect();
        FileContext::new(NameTable { file_version: version, terms, legacy_open: version == 1 })
    }

    fn modern_frame_v5_f32(t: f64, step: i64, nre: i32, dt: f64) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(-12345.0f32).to_be_bytes());
        buf.extend_from_slice(&FRAME_MAGIC.to_be_bytes());
        buf.extend_from_slice(&5i32.to_be_bytes());
        buf.extend_from_slice(&t.to_be_bytes());
        buf.extend_from_slice(&step.to_be_bytes());
        buf.extend_from_slice(&0i32.to_be_bytes()); // nsum
        buf.extend_from_slice(&1i64.to_be_bytes()); // nsteps
        buf.extend_from_slice(&dt.to_be_bytes());
        buf.extend_from_slice(&nre.to_be_bytes());
        buf.extend_from_slice(&0i32.to_be_bytes()); // reserved (ndisre slot)
        buf.extend_from_slice(&0i32.to_be_bytes()); // nblock
        buf.extend_from_slice(&0i32.to_be_bytes()); // e_size
        buf.extend_from_slice(&0i32.to_be_bytes()); // reserved
        buf.extend_from_slice(&0i32.to_be_bytes()); // reserved
        buf
    }

    #[test]
    fn decodes_modern_v5_header_and_payload() {
        let mut buf = modern_frame_v5_f32(0.5, 1, 1, 0.5);
        buf.extend_from_slice(&100.0f32.to_be_bytes());
        let mut r = XdrReader::new(&buf);
        let mut ctx = ctx_for(5, 1);
        let header = read_frame_header(&mut r, &mut ctx).unwrap().unwrap();
        assert_eq!(header.t, 0.5);
        assert_eq!(header.step, 1);
        let frame = read_frame_payload(&mut r, &mut ctx, header).unwrap();
        assert_eq!(frame.ener[0].e, 100.0);
    }

    #[test]
    fn clean_eof_at_frame_boundary_yields_none() {
        let buf: Vec<u8> = Vec::new();
        let mut r = XdrReader::new(&buf);
        let mut ctx = ctx_for(5, 1);
        assert!(read_frame_header(&mut r, &mut ctx).unwrap().is_none());
    }

    #[test]
    fn negative_step_is_corrupt_frame() {
        let buf = modern_frame_v5_f32(0.5, -1, 0, 0.0);
        let mut r = XdrReader::new(&buf);
        let mut ctx = ctx_for(5, 0);
        let header = read_frame_header(&mut r, &mut ctx).unwrap().unwrap();
        match read_frame_payload(&mut r, &mut ctx, header) {
            Err(EdrError::CorruptFrame) => {}
            other => panic!("expected CorruptFrame, got {other:?}"),
        }
    }

    #[test]
    fn bad_frame_magic_is_fatal() {
        // The 4 bytes at offset 4 aren't FRAME_MAGIC, so the probe
        // concludes double precision; the actual magic read at offset
        // 8 then also fails to match.
        let mut buf = Vec::new();
        buf.extend_from_slice(&(-99999.0f64).to_be_bytes());
        buf.extend_from_slice(&0i32.to_be_bytes());
        let mut r = XdrReader::new(&buf);
        let mut ctx = ctx_for(5, 0);
        match read_frame_header(&mut r, &mut ctx) {
            Err(EdrError::BadFrameMagic) => {}
            other => panic!("expected BadFrameMagic, got {other:?}"),
        }
    }

    #[test]
    fn unknown_block_type_is_fatal() {
        let mut buf = modern_frame_v5_f32(0.0, 0, 0, 0.0);
        // overwrite nblock (last field before e_size) with 1, then splice
        // in a block descriptor carrying a bad sub-block type code.
        let nblock_offset = buf.len() - 16;
        buf[nblock_offset..nblock_offset + 4].copy_from_slice(&1i32.to_be_bytes());
        let mut descriptor = Vec::new();
        descriptor.extend_from_slice(&0i32.to_be_bytes()); // block id
        descriptor.extend_from_slice(&1i32.to_be_bytes()); // nsub
        descriptor.extend_from_slice(&1_000_000_000i32.to_be_bytes()); // bad type code
        descriptor.extend_from_slice(&1i32.to_be_bytes()); // nr
        buf.splice(nblock_offset + 4..nblock_offset + 4, descriptor);

        let mut r = XdrReader::new(&buf);
        let mut ctx = ctx_for(5, 0);
        match read_frame_header(&mut r, &mut ctx) {
            Err(EdrError::UnknownBlockType { type_code: 1_000_000_000 }) => {}
            other => panic!("expected UnknownBlockType, got {other:?}"),
        }
    }
}
