//! A streaming decoder for OSM data in PBF format.
//!
//! An OSM PBF file is a sequence of blobs. [`Decoder`] drives the whole
//! pipeline: it validates the file's `OSMHeader` block, decodes `OSMData`
//! blocks on a pool of worker threads and hands out [`Element`]s in file order
//! through [`Decoder::decode`].
//!
//! The lower layers are exposed as well: blobs can be read one at a time with
//! [`read_blob`], decompressed and parsed by [`BlockParser::parse_block`], and
//! materialized into [`Element`]s with [`decode_primitive_block`]. The library
//! also provides utilities for reading densely or delta encoded data in these
//! blocks.
//!
//! Raw header and primitive block definitions are exported through the
//! [`pbf`] module.
//!
//! # Links
//!
//! - [OSM PBF format documentation](https://wiki.openstreetmap.org/wiki/PBF_Format)

#![forbid(unsafe_code)]

#[cfg(feature = "default")]
use flate2::read::ZlibDecoder;

use prost::Message;

#[cfg(feature = "default")]
use std::io::prelude::*;
use std::io::ErrorKind;

pub mod decode;
pub mod decoder;
pub mod dense;
pub mod element;
pub mod pbf;
pub mod util;

pub use decode::decode_primitive_block;
pub use decoder::Decoder;
pub use element::{
    read_header, BoundingBox, Element, Header, Info, Member, MemberType, Node, Relation, Tags, Way,
};

/// Serialized blob headers must stay below 64 KiB.
const MAX_BLOB_HEADER_SIZE: u32 = 64 * 1024;

/// Serialized blobs must stay below 32 MiB.
const MAX_BLOB_SIZE: i32 = 32 * 1024 * 1024;

/// Possible errors returned by the library.
#[derive(Debug)]
pub enum Error {
    /// Returned when the input stream ends in the middle of a blob frame.
    UnexpectedEof,
    /// Returned when reading from the input stream or decompression of blob data has failed.
    Io(std::io::Error),
    /// Returned when a blob header with an invalid size (>=64 KiB) is encountered.
    HeaderTooLarge(u32),
    /// Returned when blob data with an invalid size (negative or >=32 MiB) is encountered.
    BlobTooLarge(i32),
    /// Returned when a PBF parse error has occured.
    Malformed(prost::DecodeError),
    /// Returned when a blob carries no payload at all.
    UnknownBlobPayload,
    /// Returned when a blob payload uses a compression method this decoder does not inflate.
    UnsupportedCompression(&'static str),
    /// Returned when the inflated blob length differs from the declared `raw_size`.
    SizeMismatch { expected: usize, actual: usize },
    /// Returned when the first block of the file is not an `OSMHeader` block.
    MissingHeader,
    /// Returned when the file requires a feature outside the decoder's capability set.
    UnsupportedFeature(String),
    /// Returned when a relation member carries an unknown member type value.
    MalformedRelation(i32),
    /// Returned when a string table index is out of bounds.
    MalformedStringIndex(usize),
    /// Returned when a string table entry is not valid UTF-8.
    InvalidUtf8(usize),
    /// Returned when some other assumption in the data or the API usage is violated.
    LogicError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}

/// Result of [`BlockParser::parse_block`].
pub enum Block<'a> {
    /// A raw `OSMHeader` block.
    Header(pbf::HeaderBlock),
    /// A raw `OSMData` (primitive) block.
    Primitive(pbf::PrimitiveBlock),
    /// An unknown block.
    Unknown(&'a [u8]),
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockType {
    Header,
    Primitive,
    Unknown,
}

impl From<&str> for BlockType {
    fn from(value: &str) -> Self {
        match value {
            "OSMHeader" => BlockType::Header,
            "OSMData" => BlockType::Primitive,
            _ => BlockType::Unknown,
        }
    }
}

/// An unparsed, possibly compressed block.
pub struct RawBlock {
    pub(crate) r#type: BlockType,
    pub(crate) data: Vec<u8>,
}

/// Reads the next blob from `pbf`.
///
/// Returns `None` on a clean end of stream, i.e. when the stream ends exactly
/// on a blob boundary. A stream ending inside a frame yields
/// [`Error::UnexpectedEof`].
///
/// # Examples
///
/// ```no_run
/// use osm_pbf_decoder::read_blob;
///
/// use std::fs::File;
///
/// let mut file = File::open("some.osm.pbf").unwrap();
///
/// while let Some(result) = read_blob(&mut file) {
///     match result {
///         Ok(raw_block) => {}
///         Err(error) => {}
///     }
/// }
/// ```
pub fn read_blob<Input>(pbf: &mut Input) -> Option<Result<RawBlock, Error>>
where
    Input: std::io::Read,
{
    let mut header_size_buffer = [0u8; 4];
    let mut filled = 0;

    // The size prefix is read piecewise so that end-of-stream on a blob
    // boundary can be told apart from a truncated frame.
    while filled < header_size_buffer.len() {
        match pbf.read(&mut header_size_buffer[filled..]) {
            Ok(0) if filled == 0 => return None,
            Ok(0) => return Some(Err(Error::UnexpectedEof)),
            Ok(n) => filled += n,
            Err(error) if error.kind() == ErrorKind::Interrupted => continue,
            Err(error) => return Some(Err(Error::Io(error))),
        }
    }

    Some(read_blob_inner(pbf, header_size_buffer))
}

fn read_blob_inner<Input>(pbf: &mut Input, header_size_buffer: [u8; 4]) -> Result<RawBlock, Error>
where
    Input: std::io::Read,
{
    use pbf::BlobHeader;

    let blob_header_size = u32::from_be_bytes(header_size_buffer);
    if blob_header_size >= MAX_BLOB_HEADER_SIZE {
        return Err(Error::HeaderTooLarge(blob_header_size));
    }

    let mut blob = vec![0u8; blob_header_size as usize];
    read_exact(pbf, &mut blob)?;

    let blob_header = BlobHeader::decode(&*blob).map_err(Error::Malformed)?;

    let block_type = BlockType::from(blob_header.r#type.as_ref());
    if blob_header.datasize < 0 || blob_header.datasize >= MAX_BLOB_SIZE {
        return Err(Error::BlobTooLarge(blob_header.datasize));
    }

    blob.resize_with(blob_header.datasize as usize, Default::default);
    read_exact(pbf, &mut blob)?;

    Ok(RawBlock {
        r#type: block_type,
        data: blob,
    })
}

fn read_exact<Input>(pbf: &mut Input, buffer: &mut [u8]) -> Result<(), Error>
where
    Input: std::io::Read,
{
    pbf.read_exact(buffer).map_err(|error| match error.kind() {
        ErrorKind::UnexpectedEof => Error::UnexpectedEof,
        _ => Error::Io(error),
    })
}

/// Blob compression method.
pub enum CompressionMethod {
    /// Bzip2, obsolete since 2010
    Bzip2,
    /// LZ4
    Lz4,
    /// LZMA
    Lzma,
    /// ZLib
    Zlib,
    /// Zstandard
    Zstd,
}

impl CompressionMethod {
    /// The method's name as it appears in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            CompressionMethod::Bzip2 => "bzip2",
            CompressionMethod::Lz4 => "lz4",
            CompressionMethod::Lzma => "lzma",
            CompressionMethod::Zlib => "zlib",
            CompressionMethod::Zstd => "zstd",
        }
    }
}

/// Trait for custom decompression support.
pub trait Decompressor {
    /// Decompresses `input` blob data, appending the inflated bytes to `output`.
    fn decompress(method: CompressionMethod, input: &[u8], output: &mut Vec<u8>) -> Result<(), Error>;
}

/// The default blob decompressor.
///
/// Supports ZLib decompression if default features are enabled; every other
/// method is rejected with [`Error::UnsupportedCompression`].
pub struct DefaultDecompressor;

impl Decompressor for DefaultDecompressor {
    #[cfg(feature = "default")]
    fn decompress(method: CompressionMethod, input: &[u8], output: &mut Vec<u8>) -> Result<(), Error> {
        match method {
            CompressionMethod::Zlib => {
                let mut decoder = ZlibDecoder::new(input);
                decoder.read_to_end(output).map_err(Error::Io)?;
                Ok(())
            }
            _ => Err(Error::UnsupportedCompression(method.name())),
        }
    }

    #[cfg(not(feature = "default"))]
    fn decompress(method: CompressionMethod, _input: &[u8], _output: &mut Vec<u8>) -> Result<(), Error> {
        Err(Error::UnsupportedCompression(method.name()))
    }
}

/// Parser with an internal buffer for `RawBlock`s.
///
/// When multiple threads are used to speed up parsing, it's recommended to use
/// a single `BlockParser` per thread (e.g. by making it thread local), so its
/// internal buffer remains alive, avoiding repeated memory allocations.
pub struct BlockParser<D: Decompressor = DefaultDecompressor> {
    block_buffer: Vec<u8>,
    decompressor: std::marker::PhantomData<D>,
}

impl Default for BlockParser {
    fn default() -> Self {
        BlockParser::<DefaultDecompressor>::new()
    }
}

impl<D: Decompressor> BlockParser<D> {
    /// Creates a new `BlockParser`.
    pub fn new() -> Self {
        Self {
            block_buffer: Vec::new(),
            decompressor: Default::default(),
        }
    }

    /// Parses `raw_block` into a header, primitive or unknown block.
    ///
    /// Compressed payloads are checked against the blob's declared `raw_size`:
    /// a differing inflated length yields [`Error::SizeMismatch`].
    ///
    /// # Errors
    ///
    /// Will return `Err` if an error occurs during PBF parsing, decompression
    /// or validation.
    pub fn parse_block(&mut self, raw_block: RawBlock) -> Result<Block, Error> {
        let blob = pbf::Blob::decode(&*raw_block.data).map_err(Error::Malformed)?;

        let raw_size = match blob.raw_size {
            Some(size) => {
                usize::try_from(size).map_err(|_err| Error::LogicError(format!("negative raw_size: {size}")))?
            }
            None => 0,
        };

        self.block_buffer.clear();

        match blob.data {
            Some(pbf::blob::Data::Raw(raw_data)) => self.block_buffer.extend_from_slice(&raw_data),
            Some(compressed) => {
                let (method, input) = match &compressed {
                    pbf::blob::Data::ZlibData(data) => (CompressionMethod::Zlib, data),
                    pbf::blob::Data::LzmaData(data) => (CompressionMethod::Lzma, data),
                    pbf::blob::Data::ObsoleteBzip2Data(data) => (CompressionMethod::Bzip2, data),
                    pbf::blob::Data::Lz4Data(data) => (CompressionMethod::Lz4, data),
                    pbf::blob::Data::ZstdData(data) => (CompressionMethod::Zstd, data),
                    pbf::blob::Data::Raw(_) => unreachable!(),
                };

                self.block_buffer.reserve(raw_size);
                D::decompress(method, input, &mut self.block_buffer)?;

                if self.block_buffer.len() != raw_size {
                    return Err(Error::SizeMismatch {
                        expected: raw_size,
                        actual: self.block_buffer.len(),
                    });
                }
            }
            None => return Err(Error::UnknownBlobPayload),
        }

        match raw_block.r#type {
            BlockType::Header => pbf::HeaderBlock::decode(&*self.block_buffer)
                .map(Block::Header)
                .map_err(Error::Malformed),
            BlockType::Primitive => pbf::PrimitiveBlock::decode(&*self.block_buffer)
                .map(Block::Primitive)
                .map_err(Error::Malformed),
            BlockType::Unknown => Ok(Block::Unknown(&self.block_buffer)),
        }
    }
}

/// Utility for reading delta-encoded values directly, like [`pbf::Way::refs`] and [`pbf::Relation::memids`].
pub struct DeltaValueReader<'a, T> {
    remaining: &'a [T],
    accumulated: T,
}

impl<'a, T> DeltaValueReader<'a, T>
where
    T: std::default::Default,
{
    /// Constructs a new `DeltaValueReader` from a slice of values.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use osm_pbf_decoder::{pbf, DeltaValueReader};
    ///
    /// fn process_primitive_block(block: pbf::PrimitiveBlock) {
    ///     for group in &block.primitivegroup {
    ///         for way in &group.ways {
    ///             let refs = DeltaValueReader::new(&way.refs);
    ///             for node_id in refs {
    ///                 println!("{}", node_id);
    ///             }
    ///         }
    ///     }
    /// }
    /// ```
    pub fn new(values: &'a [T]) -> Self {
        DeltaValueReader {
            remaining: values,
            accumulated: T::default(),
        }
    }
}

impl<T> Iterator for DeltaValueReader<'_, T>
where
    T: std::ops::AddAssign + std::clone::Clone,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((first, elements)) = self.remaining.split_first() {
            self.accumulated += first.clone();
            self.remaining = elements;
            Some(self.accumulated.clone())
        } else {
            None
        }
    }
}



#[cfg(test)]
mod delta_value_reader_tests {
    use super::*;

    #[test]
    fn empty_input() {
        let mut reader = DeltaValueReader::new(&[] as &[i64]);
        assert_eq!(reader.next(), None);
    }

    #[test]
    fn valid_input() {
        let deltas = [1i64, 1, 3, 5];
        let decoded: Vec<i64> = DeltaValueReader::new(&deltas).collect();
        assert_eq!(decoded, [1, 2, 5, 10]);
    }

    #[test]
    fn negative_deltas() {
        let values = [10, -1, 4, -2];
        let mut reader = DeltaValueReader::new(&values);
        assert_eq!(reader.next(), Some(10));
        assert_eq!(reader.next(), Some(9));
        assert_eq!(reader.next(), Some(13));
        assert_eq!(reader.next(), Some(11));
    }
}
