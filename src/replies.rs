//! User-facing texts

pub const GREETING: &str = "Привет! Я помогу посчитать твои расходы.\n\nНапиши /add чтобы начать.";

pub const ASK_CATEGORY: &str = "На что ты часто тратишь деньги?";

pub const ASK_COST: &str = "Сколько стоит один раз (тг)?";

pub const ASK_TIMES: &str = "Сколько раз в месяц?";

/// Re-prompt after an answer that is not an integer
pub const NOT_A_NUMBER: &str = "Пожалуйста, введите число.";

pub const CANCELLED: &str = "Операция отменена.";
