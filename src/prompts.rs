//! Prompt templates sent to the oracle

use crate::models::Timestamp;

/// Appended to free-form questions ("explain briefly")
pub const EXPLAIN_SUFFIX: &str = " Giải thích ngắn gọn";

/// Ask the model which intent the input carries, as JSON
pub fn classification_prompt(user_input: &str, now: Timestamp) -> String {
    let today = now.format("%Y-%m-%d");
    let year = now.format("%Y");

    format!(
        r#"You process financial data for a small Vietnamese business.
Current date and time: {now}
Context: the user either records a transaction, asks for a report, or asks a general question.
Task: decide what the user wants and answer with JSON only.

Examples:
Input: "Hôm nay bán được 500k, mua hàng hết 300k"
Output: {{"type_input": "entry"}}

Input: "Báo cáo doanh thu quý 3"
Output: {{"type_input": "report", "report_type": "quy", "period": 3, "year": {year}}}

Input: "Báo cáo tháng 7"
Output: {{"type_input": "report", "report_type": "thang", "period": 7, "year": {year}}}

Input: "Báo cáo năm 2024"
Output: {{"type_input": "report", "report_type": "nam", "year": 2024}}

Input: "Xem báo cáo hôm nay"
Output: {{"type_input": "report", "report_type": "ngay", "date": "{today}"}}

Input: "Kế toán là gì"
Output: {{"type_input": "Search"}}

Analyse this input: {input}"#,
        now = now.format("%Y-%m-%d %H:%M:%S"),
        year = year,
        today = today,
        input = user_input,
    )
}

/// Ask the model to pull revenue, cost, note and date out of an entry
pub fn extraction_prompt(user_input: &str, now: Timestamp) -> String {
    format!(
        r#"You process financial data for a small Vietnamese business.
Current date: {today}
Context: the user describes the day's revenue and costs. Money owed counts as cost.
Task: extract the exact amounts and answer with JSON only, without code fences.
"ghi_chu" is a short note taken from the input and may be empty.
"ngay_tao" is the transaction date as YYYY-MM-DD; use the current date if none is given.

Examples:
Input: "Hôm nay bán được 500k, mua hàng hết 300k"
Output: {{"doanh_thu": 500000, "chi_phi": 300000, "ghi_chu": "bán hàng, mua hàng", "ngay_tao": "{today}"}}

Input: "Thu về 2 triệu 5, chi tiêu 1 triệu 2"
Output: {{"doanh_thu": 2500000, "chi_phi": 1200000, "ghi_chu": "", "ngay_tao": "{today}"}}

If the input is not about revenue or costs, answer with exactly: Error

Analyse this input: {input}"#,
        today = now.format("%Y-%m-%d"),
        input = user_input,
    )
}

/// Free-form question, forwarded as-is
pub fn question_prompt(user_input: &str) -> String {
    format!("{}{}", user_input, EXPLAIN_SUFFIX)
}
