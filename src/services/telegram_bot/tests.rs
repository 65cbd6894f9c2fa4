use super::*;

fn message(text: Option<&str>) -> TgMessage {
    TgMessage { chat: TgChat { id: 42 }, text: text.map(str::to_string) }
}

#[test]
fn start_plans_single_reply_with_webapp_button() {
    let reply =
        reply_for_message("https://tuner.example.com/", &message(Some("/start"))).expect("reply");

    assert_eq!(reply.chat_id, 42);
    assert_eq!(reply.text, START_REPLY_TEXT);

    let markup = reply.reply_markup.expect("keyboard");
    assert_eq!(markup["resize_keyboard"], true);

    let rows = markup["keyboard"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    let row = rows[0].as_array().expect("row");
    assert_eq!(row.len(), 1);
    assert_eq!(row[0]["text"], START_BUTTON_LABEL);
    assert_eq!(row[0]["web_app"]["url"], "https://tuner.example.com/");
}

#[test]
fn webapp_url_changes_button_payload() {
    let first = reply_for_message("http://127.0.0.1:8000/", &message(Some("/start")))
        .and_then(|reply| reply.reply_markup)
        .expect("keyboard");
    let second = reply_for_message("https://tuner.example.com/", &message(Some("/start")))
        .and_then(|reply| reply.reply_markup)
        .expect("keyboard");

    assert_ne!(first, second);
    assert_eq!(first["keyboard"][0][0]["web_app"]["url"], "http://127.0.0.1:8000/");
    assert_eq!(second["keyboard"][0][0]["web_app"]["url"], "https://tuner.example.com/");
}

#[test]
fn start_with_bot_mention_or_arguments_is_recognized() {
    for text in ["/start@TunerBot", "/start tune", "  /start  "] {
        assert!(
            reply_for_message("http://127.0.0.1:8000/", &message(Some(text))).is_some(),
            "expected a reply for {text:?}"
        );
    }
}

#[test]
fn other_commands_are_ignored() {
    for text in ["/help", "/startup", "/stop", "/start2"] {
        assert!(
            reply_for_message("http://127.0.0.1:8000/", &message(Some(text))).is_none(),
            "expected no reply for {text:?}"
        );
    }
}

#[test]
fn plain_text_and_empty_messages_are_ignored() {
    for text in [Some("привет"), Some("start"), Some("   "), None] {
        assert!(
            reply_for_message("http://127.0.0.1:8000/", &message(text)).is_none(),
            "expected no reply for {text:?}"
        );
    }
}

#[test]
fn get_updates_payload_decodes() {
    let raw = r#"{
        "ok": true,
        "result": [
            {
                "update_id": 700123,
                "message": {
                    "message_id": 5,
                    "from": {"id": 99, "is_bot": false, "first_name": "Ann"},
                    "chat": {"id": 99, "type": "private"},
                    "date": 1756400000,
                    "text": "/start"
                }
            },
            {"update_id": 700124}
        ]
    }"#;

    let parsed: TgGetUpdatesResponse = serde_json::from_str(raw).expect("decode");
    assert!(parsed.ok);
    assert_eq!(parsed.result.len(), 2);
    assert_eq!(parsed.result[0].update_id, 700123);
    let message = parsed.result[0].message.as_ref().expect("message");
    assert_eq!(message.chat.id, 99);
    assert_eq!(message.text.as_deref(), Some("/start"));
    assert!(parsed.result[1].message.is_none());
}
