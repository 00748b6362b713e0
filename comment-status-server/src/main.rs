use std::net::{SocketAddr, TcpListener};

use anyhow::Context;
use comment_status_server::AppState;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Address to listen on
    #[structopt(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    listen: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opt = <Opt as structopt::StructOpt>::from_args();

    let listener = TcpListener::bind(opt.listen)
        .with_context(|| format!("binding to {}", opt.listen))?;
    comment_status_server::serve(listener, AppState::new()).await
}
