use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardButtonKind, InlineKeyboardMarkup, KeyboardButton,
    KeyboardMarkup,
};

// Menu button labels. The dispatcher matches incoming message text against
// these exact strings.
pub const LOGIN: &str = "Войти";
pub const REGISTER: &str = "Зарегистрироваться";
pub const VIEW_SCORES: &str = "Посмотреть баллы";
pub const RECORD_SCORES: &str = "Записать баллы";
pub const ENTER_SCORES: &str = "Внести баллы ЕГЭ";
pub const CANCEL: &str = "Отмена";

/// Subject-selection callback payloads are this prefix followed by the subject name.
pub const SUBJECT_CALLBACK_PREFIX: &str = "ege_";

pub const SUBJECTS: [&str; 16] = [
    "Русский язык",
    "Математика База",
    "Математика Профиль",
    "Физика",
    "Химия",
    "Биология",
    "Литература",
    "Обществознание",
    "История",
    "География",
    "Информатика",
    "Иностранный язык (английский)",
    "Иностранный язык (немецкий)",
    "Иностранный язык (французский)",
    "Иностранный язык (испанский)",
    "Иностранный язык (китайский)",
];

pub fn main_kb() -> KeyboardMarkup {
    KeyboardMarkup::new([[KeyboardButton::new(LOGIN), KeyboardButton::new(REGISTER)]])
        .resize_keyboard(true)
        .one_time_keyboard(true)
        .input_field_placeholder("Воспользуйтесь меню:".to_owned())
}

pub fn account_kb() -> KeyboardMarkup {
    KeyboardMarkup::new([[
        KeyboardButton::new(VIEW_SCORES),
        KeyboardButton::new(RECORD_SCORES),
    ]])
    .resize_keyboard(true)
    .one_time_keyboard(true)
    .input_field_placeholder("Воспользуйтесь меню:".to_owned())
}

pub fn cancel_kb() -> KeyboardMarkup {
    KeyboardMarkup::new([[KeyboardButton::new(CANCEL)]])
        .resize_keyboard(true)
        .one_time_keyboard(true)
        .input_field_placeholder("Отмена".to_owned())
}

/// One row per subject, callback data carries the subject name.
pub fn subjects_kb() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(SUBJECTS.iter().map(|subject| {
        vec![InlineKeyboardButton::new(
            subject.to_string(),
            InlineKeyboardButtonKind::CallbackData(format!("{}{}", SUBJECT_CALLBACK_PREFIX, subject)),
        )]
    }))
}
