use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Named actions understood by the remote authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Action {
    Ping,
    LoginUser,
    RegisterUser,
    GetAvatarData,
    UpdateAvatarStats,
    SaveHealthLog,
    GetAllHealthLogs,
    GetBoxLogs,
    OpenMysteryBox,
    GetQuizPool,
    SaveBulkQuiz,
    DeleteQuizQuestion,
    AwardRandomCard,
    GetCards,
    GetUserCards,
    GetUserItems,
    GetShopRewards,
    SaveShopReward,
    DeleteShopReward,
    RedeemReward,
    GetRedemptions,
    UpdateRedemptionStatus,
    GetLeaderboardData,
    EquipItem,
    UpdateBaseEmoji,
    BroadcastReward,
    GetFriends,
    AddFriend,
    RemoveFriend,
    SendSocialAction,
    GetSocialActions,
    MarkActionsAsRead,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Ping => "ping",
            Action::LoginUser => "loginUser",
            Action::RegisterUser => "registerUser",
            Action::GetAvatarData => "getAvatarData",
            Action::UpdateAvatarStats => "updateAvatarStats",
            Action::SaveHealthLog => "saveHealthLog",
            Action::GetAllHealthLogs => "getAllHealthLogs",
            Action::GetBoxLogs => "getBoxLogs",
            Action::OpenMysteryBox => "openMysteryBox",
            Action::GetQuizPool => "getQuizPool",
            Action::SaveBulkQuiz => "saveBulkQuiz",
            Action::DeleteQuizQuestion => "deleteQuizQuestion",
            Action::AwardRandomCard => "awardRandomCard",
            Action::GetCards => "getCards",
            Action::GetUserCards => "getUserCards",
            Action::GetUserItems => "getUserItems",
            Action::GetShopRewards => "getShopRewards",
            Action::SaveShopReward => "saveShopReward",
            Action::DeleteShopReward => "deleteShopReward",
            Action::RedeemReward => "redeemReward",
            Action::GetRedemptions => "getRedemptions",
            Action::UpdateRedemptionStatus => "updateRedemptionStatus",
            Action::GetLeaderboardData => "getLeaderboardData",
            Action::EquipItem => "equipItem",
            Action::UpdateBaseEmoji => "updateBaseEmoji",
            Action::BroadcastReward => "broadcastReward",
            Action::GetFriends => "getFriends",
            Action::AddFriend => "addFriend",
            Action::RemoveFriend => "removeFriend",
            Action::SendSocialAction => "sendSocialAction",
            Action::GetSocialActions => "getSocialActions",
            Action::MarkActionsAsRead => "markActionsAsRead",
        }
    }

    /// Whether the action changes durable state on the authority.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Action::Ping
                | Action::LoginUser
                | Action::GetAvatarData
                | Action::GetAllHealthLogs
                | Action::GetBoxLogs
                | Action::GetQuizPool
                | Action::GetCards
                | Action::GetUserCards
                | Action::GetUserItems
                | Action::GetShopRewards
                | Action::GetRedemptions
                | Action::GetLeaderboardData
                | Action::GetFriends
                | Action::GetSocialActions
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_serde() {
        for action in [
            Action::GetLeaderboardData,
            Action::MarkActionsAsRead,
            Action::UpdateBaseEmoji,
            Action::Ping,
        ] {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, action.as_str());
        }
    }

    #[test]
    fn test_reads_are_not_mutating() {
        assert!(!Action::GetAvatarData.is_mutating());
        assert!(!Action::LoginUser.is_mutating());
        assert!(Action::SaveHealthLog.is_mutating());
        assert!(Action::OpenMysteryBox.is_mutating());
        assert!(Action::AwardRandomCard.is_mutating());
    }
}
