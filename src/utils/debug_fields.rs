//! Field dumps for parsed structures.
//!
//! [`DebugFields`] lists a value's fields in declaration order. It is normally
//! derived with `#[derive(DebugFields)]`; fields can be left out with
//! `#[debug_fields(skip)]` or printed under another key with
//! `#[debug_fields(rename = "...")]`.

use std::io::{self, Write};

pub trait DebugFields {
    /// Field names paired with their `Debug` rendering.
    fn debug_fields(&self) -> Vec<(&'static str, String)>;
}

/// Writes the fields of `obj` to `out` as a single tab-indented line,
/// `{'name': value, ...}`.
///
/// Keys are single-quoted. Values are their `Debug` rendering, so strings
/// come out double-quoted (`'identifier': "CUEI"`) and options as `Some(..)`.
pub fn kv_print<T, W>(obj: &T, out: &mut W) -> io::Result<()>
where
    T: DebugFields + ?Sized,
    W: Write,
{
    let body = obj
        .debug_fields()
        .iter()
        .map(|(name, value)| format!("'{name}': {value}"))
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(out, "\t{{{body}}}")
}

/// [`kv_print`] to standard output.
pub fn kv_print_stdout<T: DebugFields + ?Sized>(obj: &T) -> io::Result<()> {
    kv_print(obj, &mut io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DebugFields;

    #[derive(DebugFields)]
    struct SpliceTime {
        time_specified_flag: bool,
        pts_time: u64,
    }

    #[derive(DebugFields)]
    struct Descriptor {
        tag: u8,
        #[debug_fields(rename = "identifier")]
        id: String,
        #[debug_fields(skip)]
        _raw: Vec<u8>,
    }

    #[derive(DebugFields)]
    struct Tagged(u8, &'static str);

    #[derive(DebugFields)]
    struct Empty;

    #[derive(DebugFields)]
    struct Wrapper<T: std::fmt::Debug> {
        inner: T,
    }

    fn dump<T: DebugFields>(obj: &T) -> String {
        let mut out = Vec::new();
        kv_print(obj, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn dumps_named_fields_in_order() {
        let st = SpliceTime {
            time_specified_flag: true,
            pts_time: 8_100_000,
        };

        assert_eq!(
            st.debug_fields(),
            vec![
                ("time_specified_flag", "true".to_string()),
                ("pts_time", "8100000".to_string()),
            ]
        );
        assert_eq!(
            dump(&st),
            "\t{'time_specified_flag': true, 'pts_time': 8100000}\n"
        );
    }

    #[test]
    fn honours_skip_and_rename() {
        let d = Descriptor {
            tag: 2,
            id: "CUEI".to_string(),
            _raw: vec![0xFF],
        };

        assert_eq!(dump(&d), "\t{'tag': 2, 'identifier': \"CUEI\"}\n");
    }

    #[test]
    fn tuple_unit_and_generic_structs() {
        assert_eq!(dump(&Tagged(7, "x")), "\t{'0': 7, '1': \"x\"}\n");
        assert_eq!(dump(&Empty), "\t{}\n");
        kv_print_stdout(&Empty).unwrap();
        assert_eq!(dump(&Wrapper { inner: Some(3) }), "\t{'inner': Some(3)}\n");
    }
}
