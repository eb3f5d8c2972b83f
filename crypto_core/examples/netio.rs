//! Tiny TCP channel check: run one side with `--server`, the other
//! without, and each prints the block it received from its peer.

use crypto_core::{AbstractChannel, AesRng, Block, CommandLineOpt, NetChannel};
use rand::Rng;
use structopt::StructOpt;

fn main() -> std::io::Result<()> {
    let opt = CommandLineOpt::from_args();
    let mut channel = NetChannel::new(opt.server, &opt.addr)?;

    let mut rng = AesRng::new();
    let mine = rng.gen::<Block>();
    channel.write_block(&mine)?;
    channel.flush()?;
    let theirs = channel.read_block()?;

    println!("sent     {:?}", mine);
    println!("received {:?}", theirs);
    println!(
        "bytes: {} written, {} read",
        channel.write_count(),
        channel.read_count()
    );
    Ok(())
}
