use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn prunebib<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_prunebib"))
        .args(args)
        .output()
        .expect("failed to launch prunebib")
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

const LIBRARY: &str = r#"
@article{alpha2001, title = {First}, year = 2001}
@article{beta2002, title = {Second}, year = 2002}
@article{gamma2003, title = {Third}, year = 2003}
"#;

#[test]
fn prunes_into_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let bib = dir.path().join("library.bib");
    let tex = dir.path().join("paper.tex");
    let out = dir.path().join("pruned.bib");
    write(&bib, LIBRARY);
    write(&tex, r"We cite \cite{alpha2001} and \citep{gamma2003} only.");

    let output = prunebib([bib.as_os_str(), tex.as_os_str(), "-o".as_ref(), out.as_os_str()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let pruned = fs::read_to_string(&out).unwrap();
    let alpha = pruned.find("@article{alpha2001,").expect("alpha kept");
    let gamma = pruned.find("@article{gamma2003,").expect("gamma kept");
    assert!(alpha < gamma);
    assert!(!pruned.contains("beta2002"));
}

#[test]
fn prints_to_stdout_without_output_flag() {
    let dir = tempfile::tempdir().unwrap();
    let bib = dir.path().join("library.bib");
    let tex = dir.path().join("paper.tex");
    write(&bib, LIBRARY);
    write(&tex, r"Only \cite{beta2002} here.");

    let output = prunebib([&bib, &tex]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("@article{beta2002,"));
    assert!(!stdout.contains("alpha2001"));
}

#[test]
fn several_documents_are_merged() {
    let dir = tempfile::tempdir().unwrap();
    let bib = dir.path().join("library.bib");
    let one = dir.path().join("one.tex");
    let two = dir.path().join("two.tex");
    write(&bib, LIBRARY);
    write(&one, r"\cite{alpha2001}");
    write(&two, r"\cite{beta2002}");

    let output = prunebib([&bib, &one, &two]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("alpha2001"));
    assert!(stdout.contains("beta2002"));
    assert!(!stdout.contains("gamma2003"));
}

#[test]
fn missing_document_fails_without_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let bib = dir.path().join("library.bib");
    let out = dir.path().join("pruned.bib");
    write(&bib, LIBRARY);

    let missing = dir.path().join("missing.tex");
    let output = prunebib([
        bib.as_os_str(),
        missing.as_os_str(),
        "-o".as_ref(),
        out.as_os_str(),
    ]);

    assert!(!output.status.success());
    assert!(!out.exists(), "no output file may be created on failure");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot read LaTeX source"));
}

#[test]
fn malformed_bibliography_fails() {
    let dir = tempfile::tempdir().unwrap();
    let bib = dir.path().join("broken.bib");
    let tex = dir.path().join("paper.tex");
    write(&bib, "@article{broken,\n  title = {never closed\n");
    write(&tex, r"\cite{broken}");

    let output = prunebib([&bib, &tex]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed BibTeX"));
}
