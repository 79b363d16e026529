//! DDL for the message store

/// Name of the message table
pub const SMS_TABLE: &str = "sms";

pub const CREATE_SMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS sms (
        sequence BIGINT NOT NULL AUTO_INCREMENT,
        receiver VARCHAR(32) NOT NULL,
        message TEXT NOT NULL,
        region VARCHAR(8) NOT NULL,
        status VARCHAR(16) NOT NULL,
        message_id VARCHAR(64) NOT NULL DEFAULT '0',
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
        PRIMARY KEY (sequence),
        KEY idx_sms_status_sequence (status, sequence)
    ) ENGINE = InnoDB DEFAULT CHARSET = utf8mb4
"#;

pub const DROP_SMS_TABLE: &str = "DROP TABLE IF EXISTS sms";
