use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "negotiated-static")]
#[command(
    about = "Static file server with precompressed and image-format negotiation",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve a directory of static files
    Server(ServerArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to (overrides `server.bind_addr`)
    #[arg(long)]
    pub address: Option<SocketAddr>,

    /// Directory to serve (overrides `server.web_root`)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Configuration file (overrides `NEGOTIATED_STATIC_CONFIG`)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
