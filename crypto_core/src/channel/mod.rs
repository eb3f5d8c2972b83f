pub mod net_channel;

pub use net_channel::*;

use std::{
    io::{BufReader, BufWriter, Read, Result, Write},
    os::unix::net::UnixStream,
};

use crate::Block;

/// A synchronous byte channel between the two parties.
pub trait AbstractChannel {
    /// Write a byte slice to the channel.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
    /// Read exactly `bytes.len()` bytes from the channel.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()>;
    /// Flush the channel.
    fn flush(&mut self) -> Result<()>;

    /// Write a `bool` to the channel.
    #[inline]
    fn write_bool(&mut self, b: bool) -> Result<()> {
        self.write_bytes(&[b as u8])
    }

    /// Read a `bool` from the channel.
    #[inline]
    fn read_bool(&mut self) -> Result<bool> {
        let mut data = [0u8; 1];
        self.read_bytes(&mut data)?;
        Ok(data[0] != 0)
    }

    /// Write a `u32` to the channel, little-endian.
    #[inline]
    fn write_u32(&mut self, v: u32) -> Result<()> {
        self.write_bytes(&v.to_le_bytes())
    }

    /// Read a `u32` from the channel, little-endian.
    #[inline]
    fn read_u32(&mut self) -> Result<u32> {
        let mut data = [0u8; 4];
        self.read_bytes(&mut data)?;
        Ok(u32::from_le_bytes(data))
    }

    /// Write a `Block` to the channel.
    #[inline]
    fn write_block(&mut self, blk: &Block) -> Result<()> {
        self.write_bytes(&blk.to_bytes())
    }

    /// Read a `Block` from the channel.
    #[inline]
    fn read_block(&mut self) -> Result<Block> {
        let mut data = [0u8; 16];
        self.read_bytes(&mut data)?;
        Ok(Block::from_bytes(data))
    }

    /// Write a length-prefixed byte vector.
    #[inline]
    fn write_vec(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_u32(bytes.len() as u32)?;
        self.write_bytes(bytes)
    }

    /// Read a length-prefixed byte vector.
    #[inline]
    fn read_vec(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u32()? as usize;
        let mut data = vec![0u8; len];
        self.read_bytes(&mut data)?;
        Ok(data)
    }
}

/// A channel over any `Read`/`Write` pair.
pub struct SynChannel<R, W> {
    reader: R,
    writer: W,
    read_count: usize,
    write_count: usize,
}

impl<R: Read, W: Write> SynChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            read_count: 0,
            write_count: 0,
        }
    }

    /// Total bytes read so far.
    pub fn read_count(&self) -> usize {
        self.read_count
    }

    /// Total bytes written so far.
    pub fn write_count(&self) -> usize {
        self.write_count
    }
}

impl<R: Read, W: Write> AbstractChannel for SynChannel<R, W> {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.write_count += bytes.len();
        Ok(())
    }

    #[inline]
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<()> {
        self.reader.read_exact(bytes)?;
        self.read_count += bytes.len();
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        self.writer.flush()
    }
}

/// A channel over one end of a buffered Unix socketpair, for in-process
/// peers.
pub type LocalChannel = SynChannel<BufReader<UnixStream>, BufWriter<UnixStream>>;

impl LocalChannel {
    fn over(stream: UnixStream) -> Result<Self> {
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self::new(reader, BufWriter::new(stream)))
    }
}

/// Two connected in-process channels, one per party.
pub fn local_channel_pair() -> (LocalChannel, LocalChannel) {
    let (a, b) = UnixStream::pair().expect("socketpair");
    let a = LocalChannel::over(a).expect("socketpair endpoint");
    let b = LocalChannel::over(b).expect("socketpair endpoint");
    (a, b)
}
