//! Canned mentor replies, keyword-matched.
//!
//! Replies are queued by `ask_mentor` and delivered later by `poll_mentor`
//! on the same logical thread. There is no ordering guarantee relative to
//! other operations and a reset drops the queue.

/// A reply waiting to be delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingReply {
    /// The question that triggered it.
    pub question: String,
    /// The canned reply text.
    pub reply: String,
}

/// Pick a canned reply for a mentor question.
pub fn reply_for(question: &str) -> String {
    let lower = question.to_lowercase();
    if lower.contains("upi") {
        return "UPI rule of thumb: never share PIN/OTP, never approve requests you \
                didn't start, and always double-check the receiver name before paying."
            .to_string();
    }
    if lower.contains("save") || lower.contains("saving") {
        return "A simple teen saving rule: 50% needs, 30% wants, 20% savings. \
                Automate saving first, then spend what is left."
            .to_string();
    }
    if lower.contains("invest") || lower.contains("stock") || lower.contains("mutual") {
        return "Start by understanding risk: diversified mutual funds are generally \
                lower risk than single random stocks or crypto. Never invest money \
                you might need soon."
            .to_string();
    }
    if lower.contains("emergency") {
        return "An emergency fund is 3-6 months of basic expenses kept somewhere \
                safe, not in risky assets."
            .to_string();
    }
    if lower.contains("loan") || lower.contains("debt") {
        return "Avoid high-interest debt like credit card roll-overs or shady loan \
                apps. Always compare rates and read the terms."
            .to_string();
    }
    "For any money decision ask: is it safe, is it needed now, and what happens \
     long-term? Try keywords like 'UPI', 'saving', 'investing' or 'emergency fund'."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_route_to_topics() {
        assert!(reply_for("how do I use UPI safely?").contains("PIN/OTP"));
        assert!(reply_for("should I SAVE more?").contains("50% needs"));
        assert!(reply_for("tell me about stocks").contains("risk"));
        assert!(reply_for("what is an emergency fund").contains("3-6 months"));
        assert!(reply_for("is a loan bad").contains("high-interest"));
    }

    #[test]
    fn unknown_topics_get_the_fallback() {
        assert!(reply_for("what is the meaning of life").contains("keywords"));
    }
}
