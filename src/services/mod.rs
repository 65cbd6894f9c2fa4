pub(crate) mod telegram_bot;
