//! Local-vs-remote reply routing.
//!
//! Remote replies cost a proxy round trip, so only turns that look
//! narratively consequential go out. Everything else gets a local template.

/// Terms that mark a turn as worth a remote reply: confession, apology,
/// reconciliation, decision, choice, quest, suspicion, truth, why, how,
/// help, plan, secret, important, right now.
pub const REMOTE_TRIGGER_TERMS: &[&str] = &[
    "고백", "사과", "화해", "결정", "선택", "퀘스트", "의심", "진실", "왜", "어떻게", "도와",
    "계획", "비밀", "중요", "지금 당장",
];

/// True when the input contains any trigger term, ignoring case.
/// Blank input never goes remote.
pub fn should_call_remote(player_input: &str) -> bool {
    if player_input.trim().is_empty() {
        return false;
    }

    let input = player_input.to_lowercase();
    REMOTE_TRIGGER_TERMS
        .iter()
        .any(|term| input.contains(&term.to_lowercase()))
}
