use super::*;

fn scan_all(source: &str) -> Vec<Token> {
    let mut scanner = ScannerState::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.scan().expect("scan should succeed");
        if token.is_eof() {
            break;
        }
        tokens.push(token);
    }
    tokens
}

fn scan_error(source: &str) -> ParseError {
    let mut scanner = ScannerState::new(source);
    loop {
        match scanner.scan() {
            Ok(token) if token.is_eof() => panic!("expected a scan error for {source:?}"),
            Ok(_) => {}
            Err(err) => return err,
        }
    }
}

#[test]
fn test_longest_punctuator_wins() {
    let tokens = scan_all("a >>>= 0x1F;");
    let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["a", ">>>=", "0x1F", ";"]);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Punctuator);
    assert_eq!(tokens[2].kind, TokenKind::NumericLiteral);
    assert_eq!(tokens[2].value, 31.0);
}

#[test]
fn test_number_forms() {
    let values: Vec<f64> = scan_all("1_000 .5 1e3 0b101 0o17 2.25")
        .iter()
        .map(|t| t.value)
        .collect();
    assert_eq!(values, vec![1000.0, 0.5, 1000.0, 5.0, 15.0, 2.25]);
}

#[test]
fn test_string_escapes() {
    let tokens = scan_all(r#""\x41B\u{43}\n" 'it\'s' "😀""#);
    assert_eq!(tokens[0].text, "ABC\n");
    assert_eq!(tokens[1].text, "it's");
    assert_eq!(tokens[2].text, "\u{1f600}");
    assert!(tokens.iter().all(|t| t.kind == TokenKind::StringLiteral));
}

#[test]
fn test_comments_and_newlines() {
    let tokens = scan_all("a // line\nb /* block */ c /* multi\nline */ d");
    let names: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
    assert!(!tokens[0].newline_before);
    assert!(tokens[1].newline_before);
    assert!(!tokens[2].newline_before);
    assert!(tokens[3].newline_before);
}

#[test]
fn test_question_dot_before_digit_is_conditional() {
    let tokens = scan_all("a?.5:b");
    let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["a", "?", ".5", ":", "b"]);
}

#[test]
fn test_positions() {
    let tokens = scan_all("  foo = 1");
    assert_eq!((tokens[0].pos, tokens[0].end), (2, 5));
    assert_eq!(tokens[2].pos, 8);
}

#[test]
fn test_scan_errors() {
    assert!(matches!(
        scan_error("10n"),
        ParseError::Unsupported {
            construct: "BigInt literal",
            ..
        }
    ));
    assert!(matches!(scan_error("1e"), ParseError::InvalidNumber { .. }));
    assert_eq!(scan_error("x = 'abc"), ParseError::UnterminatedString { pos: 4 });
    assert_eq!(scan_error("/* abc"), ParseError::UnterminatedComment { pos: 0 });
    assert_eq!(
        scan_error("a @"),
        ParseError::UnexpectedCharacter { ch: '@', pos: 2 }
    );
    assert!(matches!(scan_error("`tpl`"), ParseError::Unsupported { .. }));
}
