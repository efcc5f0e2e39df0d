pub fn challenge_current(couple_id: &str) -> String {
    format!("challenge:current:{}", couple_id)
}

pub fn challenge_history(couple_id: &str, week_key: &str) -> String {
    format!("challenge:history:{}:{}", couple_id, week_key)
}

pub fn challenge_history_prefix(couple_id: &str) -> String {
    format!("challenge:history:{}:", couple_id)
}

pub fn daily_current(couple_id: &str) -> String {
    format!("daily:current:{}", couple_id)
}

pub fn daily_history(couple_id: &str, date: &str) -> String {
    format!("daily:history:{}:{}", couple_id, date)
}

pub fn daily_history_prefix(couple_id: &str) -> String {
    format!("daily:history:{}:", couple_id)
}
