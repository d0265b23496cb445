//! Canned replies for turns that do not warrant a proxy round trip.

use super::talk::NpcReply;
use daytalk_shared::ReplySource;

/// Note attached to every local reply.
pub const LOCAL_REPLY_NOTE: &str = "로컬 응답 사용";

/// Reply text for a world time label. Unknown labels get the fallback line.
pub fn local_reply_text(time_slot: &str) -> &'static str {
    match time_slot {
        "morning" => "안녕하세요. 오늘 오전 일정부터 정리하겠습니다. 무엇을 우선할까요?",
        "afternoon" => "오후에는 처리할 일이 늘어납니다. 우선순위를 말씀해 주세요.",
        "evening" => "저녁입니다. 오늘 남은 과제를 마무리할지, 정리하고 쉬실지 결정하셔야 합니다.",
        _ => "지금은 무리하지 않는 게 좋겠습니다. 가장 필요한 것부터 말해 주세요.",
    }
}

pub(super) fn local_reply(time_slot: &str) -> NpcReply {
    NpcReply {
        text: local_reply_text(time_slot).to_string(),
        source: ReplySource::Local,
        affinity_delta: 0,
        flag_updates: Vec::new(),
        note: LOCAL_REPLY_NOTE.to_string(),
    }
}
