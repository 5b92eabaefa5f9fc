use memmap2::Mmap;

use crate::error::{DdsViewError, Result};
use crate::texture::TexMetadata;

/// Location of one 2D image (one mip of one array item, or one depth slice
/// of a volume mip) inside the texel payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subresource {
    pub item: u32,
    pub mip: u32,
    pub slice: u32,
    pub width: u32,
    pub height: u32,
    pub row_pitch: usize,
    pub slice_pitch: usize,
    /// Byte offset relative to the start of the payload.
    pub offset: usize,
}

enum Storage {
    Mapped { mmap: Mmap, offset: usize },
    Owned(Vec<u8>),
}

impl Storage {
    fn bytes(&self) -> &[u8] {
        match self {
            Storage::Mapped { mmap, offset } => &mmap[*offset..],
            Storage::Owned(bytes) => bytes,
        }
    }
}

/// A fully described texture in host memory, laid out the way DDS stores it:
/// array items outermost, then mips, then depth slices.
pub struct ScratchImage {
    metadata: TexMetadata,
    storage: Storage,
    subresources: Vec<Subresource>,
    payload_len: usize,
}

impl ScratchImage {
    /// Wrap a mapped DDS file whose texels start at `offset`.
    pub fn from_mapped(mmap: Mmap, offset: usize, metadata: TexMetadata) -> Result<Self> {
        Self::new(Storage::Mapped { mmap, offset }, metadata)
    }

    /// Wrap an owned texel payload.
    pub fn from_bytes(bytes: Vec<u8>, metadata: TexMetadata) -> Result<Self> {
        Self::new(Storage::Owned(bytes), metadata)
    }

    fn new(storage: Storage, metadata: TexMetadata) -> Result<Self> {
        // Sized before the table is built so header counts cannot force a
        // large allocation on a short file.
        let payload_len = payload_size(&metadata)?;
        let available = storage.bytes().len();
        if available < payload_len {
            return Err(DdsViewError::Decode(format!(
                "truncated payload: need {payload_len} bytes, have {available}"
            )));
        }
        let (subresources, _) = layout(&metadata)?;

        Ok(Self {
            metadata,
            storage,
            subresources,
            payload_len,
        })
    }

    pub fn metadata(&self) -> &TexMetadata {
        &self.metadata
    }

    pub fn subresources(&self) -> &[Subresource] {
        &self.subresources
    }

    /// All texel bytes in storage order, without trailing file bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.storage.bytes()[..self.payload_len]
    }

    pub fn subresource(&self, item: u32, mip: u32, slice: u32) -> Result<&Subresource> {
        self.subresources
            .iter()
            .find(|s| s.item == item && s.mip == mip && s.slice == slice)
            .ok_or(DdsViewError::SubresourceOutOfRange {
                item: item as usize,
                mip: mip as usize,
                slice: slice as usize,
            })
    }

    /// Bytes of one 2D image.
    pub fn image(&self, item: u32, mip: u32, slice: u32) -> Result<&[u8]> {
        let sub = self.subresource(item, mip, slice)?;
        Ok(&self.storage.bytes()[sub.offset..sub.offset + sub.slice_pitch])
    }
}

fn overflow() -> DdsViewError {
    DdsViewError::InvalidDds("texture payload size overflows".into())
}

/// Total texel bytes `meta` describes, without listing the subresources.
pub fn payload_size(meta: &TexMetadata) -> Result<usize> {
    let mut item_len = 0usize;
    for mip in 0..meta.mip_levels {
        let (width, height, depth) = meta.mip_extent(mip);
        let (_, slice_pitch) = meta.format.compute_pitch(width, height)?;
        let slices = if meta.is_volume() { depth } else { 1 };
        let mip_len = slice_pitch
            .checked_mul(slices as usize)
            .ok_or_else(overflow)?;
        item_len = item_len.checked_add(mip_len).ok_or_else(overflow)?;
    }
    item_len
        .checked_mul(meta.array_size as usize)
        .ok_or_else(overflow)
}

/// Compute the subresource table and total payload size for `meta`.
pub fn layout(meta: &TexMetadata) -> Result<(Vec<Subresource>, usize)> {
    let mut subresources = Vec::new();
    let mut offset = 0usize;

    for item in 0..meta.array_size {
        for mip in 0..meta.mip_levels {
            let (width, height, depth) = meta.mip_extent(mip);
            let (row_pitch, slice_pitch) = meta.format.compute_pitch(width, height)?;
            let slices = if meta.is_volume() { depth } else { 1 };
            for slice in 0..slices {
                subresources.push(Subresource {
                    item,
                    mip,
                    slice,
                    width,
                    height,
                    row_pitch,
                    slice_pitch,
                    offset,
                });
                offset = offset.checked_add(slice_pitch).ok_or_else(overflow)?;
            }
        }
    }

    Ok((subresources, offset))
}
