use crate::AbstractChannel;
use std::io::{BufReader, BufWriter, Read, Result, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use structopt::StructOpt;

/// A TCP channel; the server side listens and accepts a single peer.
pub struct NetChannel {
    is_server: bool,
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    read_count: usize,
    write_count: usize,
}

impl NetChannel {
    pub fn new<A: ToSocketAddrs>(is_server: bool, addr: A) -> Result<Self> {
        let socket = if is_server {
            let listener = TcpListener::bind(addr)?;
            let (socket, _) = listener.accept()?;
            socket
        } else {
            TcpStream::connect(addr)?
        };

        Ok(Self {
            is_server,
            reader: BufReader::new(socket.try_clone()?),
            writer: BufWriter::new(socket),
            read_count: 0,
            write_count: 0,
        })
    }

    pub fn is_server(&self) -> bool {
        self.is_server
    }

    pub fn read_count(&self) -> usize {
        self.read_count
    }

    pub fn write_count(&self) -> usize {
        self.write_count
    }
}

impl AbstractChannel for NetChannel {
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

#[derive(StructOpt, Debug)]
pub struct CommandLineOpt {
    /// Run as the listening side.
    #[structopt(short, long)]
    pub server: bool,

    /// Address to bind or connect to.
    #[structopt(short, long, default_value = "127.0.0.1:7766")]
    pub addr: String,
}
