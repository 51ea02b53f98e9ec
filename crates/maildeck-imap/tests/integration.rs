//! Integration tests: tokenizing, parsing and answering FETCH commands.

use maildeck_imap::parser::{normalize, tokenize};
use maildeck_imap::protocol::check_state_and_args;
use maildeck_imap::{
    Arity, FetchItemParser, FetchRequest, FetchResponse, Limits, SectionKind, SessionState,
    StateRequirement, Token,
};
use maildeck_mime::{ByteWindow, Headers, MimeNode};
use proptest::prelude::*;

fn parse(input: &str) -> maildeck_imap::Result<FetchRequest> {
    let tokens = tokenize(input)?;
    FetchItemParser::parse(&tokens, &Limits::default())
}

fn mailbox_message() -> MimeNode {
    MimeNode::message(
        Headers::parse(concat!(
            "Date: Wed, 2 Oct 2024 08:15:00 +0200\r\n",
            "From: John Doe <john@example.com>\r\n",
            "To: team@example.com\r\n",
            "Subject: Report\r\n",
            "Content-Type: multipart/mixed;\r\n boundary=\"b\"\r\n",
            "\r\n",
        )),
        900,
        30,
    )
    .with_child(MimeNode::part(
        Headers::new().with("Content-Type", "text/plain; charset=utf-8"),
        100,
        5,
    ))
    .with_child(MimeNode::part(
        Headers::new()
            .with("Content-Type", "application/pdf; name=report.pdf")
            .with("Content-Transfer-Encoding", "base64"),
        600,
        8,
    ))
}

#[test]
fn test_tokenize_header_fields_request() {
    let texts: Vec<_> = tokenize("(BODY[HEADER.FIELDS (DATE FROM)])")
        .unwrap()
        .iter()
        .map(|t| t.as_str().to_string())
        .collect();
    assert_eq!(
        texts,
        ["(", "BODY", "[", "HEADER.FIELDS", "(", "DATE", "FROM", ")", "]", ")"]
    );
}

#[test]
fn test_fast_sets_exactly_three_flags() {
    let request = parse("FAST").unwrap();
    assert!(request.flags && request.internal_date && request.rfc822_size);

    let mut expected = FetchRequest::new();
    expected.set_fast();
    assert_eq!(request, expected);
    assert!(request.sections.is_empty());
}

#[test]
fn test_text_section_with_part() {
    let request = parse("BODY[1.2.TEXT]").unwrap();
    assert_eq!(request.sections.len(), 1);

    let section = &request.sections[0];
    assert_eq!(section.part, [1, 2]);
    assert_eq!(section.kind, SectionKind::Text);
    assert!(!section.peek);
    assert_eq!(section.window, None);
}

#[test]
fn test_malformed_requests() {
    assert!(parse("BODY.PEEK").unwrap_err().is_malformed());
    assert!(parse("BODY[1..TEXT]").unwrap_err().is_malformed());
    assert!(parse("(FLAGS").unwrap_err().is_malformed());
}

#[test]
fn test_full_command_flow() {
    let line = normalize("  1:3   (FLAGS  BODY.PEEK[HEADER.FIELDS (Subject From)]<0.20> BODYSTRUCTURE)\r\n")
        .unwrap();
    let tokens = tokenize(&line).unwrap();

    check_state_and_args(
        "FETCH",
        StateRequirement::Selected,
        SessionState::Selected,
        &tokens,
        Arity::exactly(2),
    )
    .unwrap();

    // Drop the sequence set.
    let request = FetchItemParser::parse(&tokens[1..], &Limits::default()).unwrap();
    assert!(request.flags && request.body_structure);
    assert!(!request.sets_seen());
    assert_eq!(request.sections[0].window, Some(ByteWindow::new(0, 20)));

    let node = mailbox_message();
    let rendered = String::from_utf8(FetchResponse::new(&request, &node).to_bytes().unwrap()).unwrap();

    assert_eq!(
        rendered,
        concat!(
            "BODYSTRUCTURE ((\"TEXT\" \"PLAIN\" (\"charset\" \"utf-8\") NIL NIL NIL 100 5 NIL NIL NIL)",
            "(\"APPLICATION\" \"PDF\" (\"name\" \"report.pdf\") NIL NIL \"base64\" 600 NIL NIL NIL) ",
            "\"MIXED\" (\"boundary\" \"b\") NIL NIL) ",
            "BODY[HEADER.FIELDS (Subject From)]<0> {20}\r\n",
            "From: John Doe <john"
        )
    );
}

#[test]
fn test_fetch_outside_selected_state() {
    let tokens = tokenize("1 FLAGS").unwrap();
    let rejection = check_state_and_args(
        "fetch",
        StateRequirement::Selected,
        SessionState::Authenticated,
        &tokens,
        Arity::exactly(2),
    )
    .unwrap_err();
    assert_eq!(
        rejection.to_response("a1"),
        "a1 BAD FETCH command received in invalid state\r\n"
    );
}

#[test]
fn test_window_past_end_of_header() {
    let request = parse("BODY[HEADER]<5000.10>").unwrap();
    let node = mailbox_message();
    let rendered = FetchResponse::new(&request, &node).to_bytes().unwrap();
    let rendered = String::from_utf8(rendered).unwrap();

    assert!(rendered.starts_with("BODY[HEADER]<"));
    assert!(rendered.ends_with("> {0}\r\n"));
}

#[tokio::test]
async fn test_write_to_async_sink() {
    let request = parse("ENVELOPE").unwrap();
    let node = mailbox_message();

    let mut sink = Vec::new();
    FetchResponse::new(&request, &node)
        .write_to(&mut sink)
        .await
        .unwrap();

    let text = String::from_utf8(sink).unwrap();
    assert!(text.starts_with("ENVELOPE (\"Wed, 2 Oct 2024 08:15:00 +0200\" \"Report\" "));
    assert!(text.contains("((\"John Doe\" NIL \"john\" \"example.com\"))"));
}

fn atom_text() -> impl Strategy<Value = String> {
    "[A-Za-z0-9.:*<>-]{1,8}"
}

fn token() -> impl Strategy<Value = Token> {
    prop_oneof![
        atom_text().prop_map(Token::Atom),
        "[ -~]{0,8}".prop_map(Token::Quoted),
    ]
}

fn balanced(depth: u32) -> BoxedStrategy<Vec<Token>> {
    let flat = proptest::collection::vec(token(), 0..5);
    if depth == 0 {
        return flat.boxed();
    }
    let inner = balanced(depth - 1);
    (flat, inner, any::<bool>(), proptest::collection::vec(token(), 0..3))
        .prop_map(|(mut before, inner, paren, after)| {
            let (open, close) = if paren {
                (Token::LParen, Token::RParen)
            } else {
                (Token::LBracket, Token::RBracket)
            };
            before.push(open);
            before.extend(inner);
            before.push(close);
            before.extend(after);
            before
        })
        .boxed()
}

proptest! {
    #[test]
    fn prop_retokenize_is_stable(tokens in balanced(3)) {
        let joined = tokens.iter().map(Token::to_wire).collect::<Vec<_>>().join(" ");
        let first = tokenize(&joined).unwrap();
        prop_assert_eq!(&first, &tokens);

        let rejoined = first.iter().map(Token::to_wire).collect::<Vec<_>>().join(" ");
        prop_assert_eq!(tokenize(&rejoined).unwrap(), first);
    }

    #[test]
    fn prop_tokenizer_never_panics(input in "\\PC{0,40}") {
        let _ = tokenize(&input);
    }
}
