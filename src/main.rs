mod cli;
mod config;
mod encoding;
mod error;
mod logging;
mod paths;
mod playlist;
mod runtime;
mod source;
mod sync;

#[cfg(test)]
mod test_support;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    runtime::run()
}
