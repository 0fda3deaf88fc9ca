//! The `info` target: five lines of tool metadata (§6, grounded in the
//! original fuzzer submissions' `info` output), then exit 0.

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) fn print() {
    println!("jpamb");
    println!("{VERSION}");
    println!("jpamb contributors");
    println!("abstract-interpretation,concrete-interpreter,cfg");
    println!("yes");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!VERSION.is_empty());
    }
}
