use ic_cdk::api::caller;
use std::collections::{BTreeMap, HashMap};

const MAX_ENTRIES: usize = 100;

/// Returns a greeting for `name`.
pub async fn greet(name: String) -> String {
    format!("Hello, {}!", name)
}

pub async fn transfer(to: Principal, amount: u64, memo: Option<Vec<u8>>) -> Result<u64, String> {
    Ok(amount)
}

fn helper() -> u32 {
    42
}
