// SPDX-FileCopyrightText: 2026 Robotagg Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Localized user-facing messages.

use robotagg_core::Locale;

/// An outcome worth telling the user about. Failure variants carry the error
/// detail that is appended to the localized prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    FillAllFields,
    RobotAdded,
    AddFailed(String),
    RobotUpdated,
    UpdateFailed(String),
    RobotDeleted,
    DeleteFailed(String),
    RobotEnabled,
    RobotDisabled,
    StatusChangeFailed(String),
    ConnectionSucceeded,
    ConnectionFailed(String),
    EnterMessage,
    RobotInactive,
    MessageSent(String),
    SendFailed(String),
    LoadFailed(String),
    HistoryFailed(String),
}

impl Notice {
    /// Render the notice in `locale`.
    pub fn render(&self, locale: Locale) -> String {
        let (prefix, detail) = self.parts(locale);
        match detail {
            Some(detail) => format!("{prefix}{detail}"),
            None => prefix.to_string(),
        }
    }

    fn parts(&self, locale: Locale) -> (&'static str, Option<&str>) {
        use Notice::*;

        let zh = locale == Locale::Zh;
        let pick = |en: &'static str, cn: &'static str| if zh { cn } else { en };

        match self {
            FillAllFields => (pick("Please fill in all fields", "请填写所有字段"), None),
            RobotAdded => (pick("Robot added", "机器人添加成功"), None),
            AddFailed(d) => (pick("Failed to add robot: ", "添加机器人失败: "), Some(d.as_str())),
            RobotUpdated => (pick("Robot updated", "机器人更新成功"), None),
            UpdateFailed(d) => (pick("Failed to update robot: ", "更新机器人失败: "), Some(d.as_str())),
            RobotDeleted => (pick("Robot deleted", "机器人删除成功"), None),
            DeleteFailed(d) => (pick("Failed to delete robot: ", "删除机器人失败: "), Some(d.as_str())),
            RobotEnabled => (pick("Robot enabled", "机器人已启用"), None),
            RobotDisabled => (pick("Robot disabled", "机器人已停用"), None),
            StatusChangeFailed(d) => (
                pick("Failed to change robot status: ", "更新机器人状态失败: "),
                Some(d.as_str()),
            ),
            ConnectionSucceeded => (pick("Connection successful", "连接成功"), None),
            ConnectionFailed(d) => (pick("Connection failed: ", "连接失败: "), Some(d.as_str())),
            EnterMessage => (pick("Please enter a message", "请输入消息"), None),
            RobotInactive => (pick("Robot is not active", "机器人未启用"), None),
            MessageSent(reply) => (pick("Message sent: ", "消息发送成功: "), Some(reply.as_str())),
            SendFailed(d) => (pick("Failed to send message: ", "消息发送失败: "), Some(d.as_str())),
            LoadFailed(d) => (pick("Failed to load robots: ", "加载机器人列表失败: "), Some(d.as_str())),
            HistoryFailed(d) => (
                pick("Failed to load message history: ", "加载消息记录失败: "),
                Some(d.as_str()),
            ),
        }
    }
}
