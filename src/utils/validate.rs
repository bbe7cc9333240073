use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

// 国际格式或本地号码：可选 +，7 到 15 位数字，允许空格和连字符分组
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 -]{5,18}[0-9]$").expect("Invalid phone regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if !PHONE_RE.is_match(phone) || !(7..=15).contains(&digits) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

/// 姓名、分馆名等必填文本：去掉首尾空白后 1 到 `max` 个字符
pub fn validate_required_text(value: &str, max: usize) -> Result<(), &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Value must not be empty");
    }
    if trimmed.chars().count() > max {
        return Err("Value is too long");
    }
    Ok(())
}

/// `YYYY-MM-DD` 格式的日历日期
pub fn validate_date(value: &str) -> Result<(), &'static str> {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| "Date must be a valid YYYY-MM-DD date")
}

/// 可选的联系方式，提供时必须合法
pub fn validate_contact(email: Option<&str>, phone: Option<&str>) -> Result<(), &'static str> {
    if let Some(email) = email {
        validate_email(email)?;
    }
    if let Some(phone) = phone {
        validate_phone(phone)?;
    }
    Ok(())
}

// 密码策略：每条规则不满足时给出对应的提示
const PASSWORD_RULES: &[(fn(&str) -> bool, &str)] = &[
    (|p| p.chars().count() >= 8, "at least 8 characters"),
    (|p| p.chars().any(|c| c.is_ascii_uppercase()), "an uppercase letter"),
    (|p| p.chars().any(|c| c.is_ascii_lowercase()), "a lowercase letter"),
    (|p| p.chars().any(|c| c.is_ascii_digit()), "a digit"),
];

// 满足规则但过于常见的密码
const COMMON_PASSWORDS: &[&str] = &["password1", "qwerty123", "abcd1234", "karate123", "dojo1234"];

/// 所有未满足的要求合并成一条提示返回
pub fn validate_password(password: &str) -> Result<(), String> {
    let missing: Vec<&str> = PASSWORD_RULES
        .iter()
        .filter(|(check, _)| !check(password))
        .map(|(_, requirement)| *requirement)
        .collect();

    if !missing.is_empty() {
        return Err(format!("Password needs {}", missing.join(", ")));
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|common| password.eq_ignore_ascii_case(common))
    {
        return Err("Password is too common".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("sensei_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("coach@dojo.example").is_ok());
        assert!(validate_email("coach@dojo").is_err());
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("+61 412 345 678").is_ok());
        assert!(validate_phone("0412-345-678").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("+1234567890123456").is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Aiko Tanaka", 100).is_ok());
        assert!(validate_required_text("   ", 100).is_err());
        assert!(validate_required_text("abcdef", 5).is_err());
    }

    #[test]
    fn test_date_rules() {
        assert!(validate_date("2024-02-29").is_ok());
        assert!(validate_date("2023-02-29").is_err());
        assert!(validate_date("01/03/2024").is_err());
    }

    #[test]
    fn test_contact_is_optional() {
        assert!(validate_contact(None, None).is_ok());
        assert!(validate_contact(Some("front@dojo.example"), Some("+44 20 7946 0958")).is_ok());
        assert_eq!(
            validate_contact(Some("front-desk"), None),
            Err("Email format is invalid")
        );
        assert!(validate_contact(None, Some("12")).is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("Kihon2024").is_ok());
        assert!(validate_password("MyP@ssw0rd").is_ok());

        assert_eq!(
            validate_password("Ab1"),
            Err("Password needs at least 8 characters".to_string())
        );
        assert_eq!(
            validate_password("abcdefgh"),
            Err("Password needs an uppercase letter, a digit".to_string())
        );
        assert_eq!(
            validate_password("Karate123"),
            Err("Password is too common".to_string())
        );
    }
}
