mod analysis;
mod argument;
mod error;
mod info;
mod logging;

use argument::Arguments;
use clap::Parser;
use error::{Error, Result};
use jpamb_opcode::MethodId;

fn main() {
    let cli = Arguments::parse();
    logging::initialize();

    if let Err(error) = common_main(&cli) {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

fn common_main(cli: &Arguments) -> Result<()> {
    if cli.target == "info" {
        info::print();
        return Ok(());
    }

    // Validates the method identifier's syntax, but this binary ships with
    // no real bytecode loader (§1): wiring one in is the integration point
    // for `analysis::report`, exercised by this crate's own tests.
    let method = MethodId::parse(&cli.target)?;
    Err(Error::NoLoaderConfigured(method.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_target_succeeds() {
        let cli = Arguments::parse_from(["jpamb", "info"]);
        assert!(common_main(&cli).is_ok());
    }

    #[test]
    fn a_valid_method_id_reports_no_loader_configured() {
        let cli = Arguments::parse_from(["jpamb", "Fixtures.divByParam:(I)I"]);
        assert!(matches!(common_main(&cli), Err(Error::NoLoaderConfigured(_))));
    }

    #[test]
    fn an_invalid_method_id_is_a_parse_error() {
        let cli = Arguments::parse_from(["jpamb", "not-a-method-id"]);
        assert!(matches!(common_main(&cli), Err(Error::InvalidMethodId(_))));
    }
}
