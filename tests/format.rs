use std::{
    fs,
    path::{Path, PathBuf},
};

use nice65::{format_source, Error, Options, Outcome};

const LEGACY: Options = Options {
    colon_required: false,
};

const FIXTURES: &[(&str, Options)] = &[
    (
        "routines",
        Options {
            colon_required: true,
        },
    ),
    ("legacy", LEGACY),
];

fn fixture_path(stem: &str, kind: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{stem}.{kind}.s"))
}

fn read_fixture(stem: &str, kind: &str) -> String {
    let path = fixture_path(stem, kind);
    fs::read_to_string(&path).unwrap_or_else(|err| {
        panic!("missing fixture {}: {err}", path.display());
    })
}

fn formatted(source: &str, options: Options) -> String {
    match format_source(source, options).unwrap() {
        Outcome::Formatted(text) => text,
        Outcome::Ignored => panic!("source was ignored"),
    }
}

#[test]
fn fixtures_match_expectations() {
    for (stem, options) in FIXTURES {
        let input = read_fixture(stem, "input");
        let expected = read_fixture(stem, "expected");
        assert_eq!(
            formatted(&input, *options),
            expected,
            "fixture mismatch for {stem}"
        );
    }
}

#[test]
fn formatting_is_idempotent() {
    for (stem, options) in FIXTURES {
        let once = formatted(&read_fixture(stem, "input"), *options);
        let twice = formatted(&once, *options);
        assert_eq!(once, twice, "idempotence failed for {stem}");
    }
}

#[test]
fn statement_and_comment_columns() {
    assert_eq!(
        formatted("  lda #$10 ; load\n", Options::default()),
        "        LDA #$10        ; load\n"
    );
    assert_eq!(formatted("loop: dex\n", Options::default()), "loop:   DEX\n");
}

#[test]
fn column_one_directive_stays_flush_left() {
    assert_eq!(
        formatted(".segment \"CODE\"\n", Options::default()),
        ".segment \"CODE\"\n"
    );
    assert_eq!(
        formatted("        .SEGMENT \"RODATA\"\n", Options::default()),
        ".segment \"RODATA\"\n"
    );
}

#[test]
fn long_local_label_wraps() {
    assert_eq!(
        formatted(
            "@verylonglabelname: bne @verylonglabelname\n",
            Options::default()
        ),
        "    @verylonglabelname:\n        BNE @verylonglabelname\n"
    );
}

#[test]
fn malformed_hex_fails_whole_file() {
    let source = "start:\n  lda #$10\n  lda $$10\n  rts\n";
    match format_source(source, Options::default()) {
        Err(Error::Parse(e)) => {
            assert_eq!(e.line, 3);
            assert_eq!(e.message, "malformed hex literal");
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn ignored_files_are_left_alone() {
    for first in [
        "; nice65: ignore",
        ";NICE65:IGNORE",
        "  ; nice65: wide, ignore",
        "; Nice65: ignore other",
    ] {
        let source = format!("{first}\nthis is $$ not even assembly\n");
        assert_eq!(
            format_source(&source, Options::default()).unwrap(),
            Outcome::Ignored,
            "{first}"
        );
    }
    // only the first line counts
    let source = "  nop\n; nice65: ignore\n";
    assert_eq!(
        formatted(source, Options::default()),
        "        NOP\n; nice65: ignore\n"
    );
}

#[test]
fn unknown_mnemonics_keep_their_case() {
    assert_eq!(
        formatted("  PushAX #1\n  lDx #2\n", Options::default()),
        "        PushAX #1\n        LDX #2\n"
    );
}

#[test]
fn missing_final_newline_is_accepted() {
    assert_eq!(formatted("  rts", Options::default()), "        RTS\n");
}
