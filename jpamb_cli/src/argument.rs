use clap::Parser;

/// Analyzer and test-input generator for JVM bytecode methods.
///
/// `target` is either a method identifier in the
/// `package/path/Class.method:(param-types)return-type` form, or the literal
/// `info` to print tool metadata and exit.
#[derive(Parser, Debug)]
#[command(name = "jpamb", version, about, allow_negative_numbers = true)]
pub struct Arguments {
    pub target: String,

    /// A concrete integer argument to additionally witness with a concrete
    /// run, in parameter order. May be repeated.
    #[arg(long = "arg")]
    pub args: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_method_id_with_no_concrete_arguments() {
        let cli = Arguments::parse_from(["jpamb", "Fixtures.divByParam:(I)I"]);
        assert_eq!(cli.target, "Fixtures.divByParam:(I)I");
        assert!(cli.args.is_empty());
    }

    #[test]
    fn parses_repeated_arg_flags_in_order() {
        let cli = Arguments::parse_from(["jpamb", "Fixtures.sum:(I)I", "--arg", "3", "--arg", "-1"]);
        assert_eq!(cli.args, vec![3, -1]);
    }

    #[test]
    fn parses_the_info_target() {
        let cli = Arguments::parse_from(["jpamb", "info"]);
        assert_eq!(cli.target, "info");
    }
}
