//! 跨面板物品转移：描述符解析、数量输入框和发往来源面板的移除请求。

use bevy::prelude::*;
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use crate::inventory::components::{ItemIndex, ItemRecord};
use crate::inventory::tabs::Tab;

/// 发起拖拽的面板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourcePanel {
    Inventory,
    Storage,
    Cart,
    Mail,
    RodexDraft,
}

impl SourcePanel {
    /// 识别拖拽数据里的 `from` 字段，兼容界面上的旧名字
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Inventory" => Some(Self::Inventory),
            "Storage" => Some(Self::Storage),
            "Cart" | "CartItems" => Some(Self::Cart),
            "Mail" => Some(Self::Mail),
            "RodexDraft" | "WriteRodex" => Some(Self::RodexDraft),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Inventory => "Inventory",
            Self::Storage => "Storage",
            Self::Cart => "Cart",
            Self::Mail => "Mail",
            Self::RodexDraft => "RodexDraft",
        }
    }

    /// 只有这四个面板能把物品拖进背包
    pub fn can_feed_inventory(self) -> bool {
        !matches!(self, Self::Inventory)
    }
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("malformed transfer descriptor: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported transfer kind `{0}`")]
    WrongKind(String),
    #[error("unknown source panel `{0}`")]
    UnknownSource(String),
    #[error("{} cannot drop items into the inventory", .0.tag())]
    SourceNotAllowed(SourcePanel),
    #[error("a quantity prompt is already pending")]
    PromptBusy,
    #[error("no quantity prompt is pending")]
    NoPendingPrompt,
    #[error("quantity {requested} out of range 1..={max}")]
    InvalidQuantity { requested: u32, max: u32 },
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(rename = "type")]
    kind: String,
    from: String,
    data: serde_json::Value,
}

/// 标签页拖放只需要序号
#[derive(Deserialize)]
struct RawIndex {
    index: ItemIndex,
}

#[derive(Serialize)]
struct RawDescriptorRef<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    from: &'static str,
    data: &'a ItemRecord,
}

/// 拖拽时携带的数据。`payload` 是快照，来源面板之后怎么改都不影响它。
#[derive(Debug, Clone, PartialEq)]
pub struct TransferDescriptor {
    pub source: SourcePanel,
    pub payload: ItemRecord,
}

impl TransferDescriptor {
    pub const KIND: &'static str = "item";

    pub fn new(source: SourcePanel, item: &ItemRecord) -> Self {
        Self {
            source,
            payload: item.clone(),
        }
    }

    /// `{"type":"item","from":"Storage","data":{...}}`
    pub fn parse(text: &str) -> Result<Self, TransferError> {
        let raw: RawDescriptor = serde_json::from_str(text)?;
        if raw.kind != Self::KIND {
            return Err(TransferError::WrongKind(raw.kind));
        }
        let source =
            SourcePanel::from_tag(&raw.from).ok_or(TransferError::UnknownSource(raw.from))?;
        let payload = serde_json::from_value(raw.data)?;
        Ok(Self { source, payload })
    }

    pub fn encode(&self) -> Result<String, TransferError> {
        Ok(serde_json::to_string(&RawDescriptorRef {
            kind: Self::KIND,
            from: self.source.tag(),
            data: &self.payload,
        })?)
    }
}

/// 发给来源面板的移除请求，真正的入包等服务器回 ItemAppeared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveRequest {
    pub panel: SourcePanel,
    pub index: ItemIndex,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTransfer {
    pub source: SourcePanel,
    pub index: ItemIndex,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    /// 弹出数量输入框，范围 1..=max
    AwaitQuantity { max: u32 },
    Commit(RemoveRequest),
}

/// 数量输入框只有一个，同时只能挂起一次需要输入数量的转移
#[derive(Resource, Debug, Default)]
pub struct TransferDesk {
    pending: Option<PendingTransfer>,
}

impl TransferDesk {
    pub fn pending(&self) -> Option<&PendingTransfer> {
        self.pending.as_ref()
    }

    /// 物品被放到背包上
    pub fn begin(&mut self, text: &str) -> Result<TransferStep, TransferError> {
        let descriptor = TransferDescriptor::parse(text)?;
        if !descriptor.source.can_feed_inventory() {
            return Err(TransferError::SourceNotAllowed(descriptor.source));
        }

        let index = descriptor.payload.index;
        let count = descriptor.payload.amount();
        if count > 1 {
            if self.pending.is_some() {
                return Err(TransferError::PromptBusy);
            }
            self.pending = Some(PendingTransfer {
                source: descriptor.source,
                index,
                max: count,
            });
            return Ok(TransferStep::AwaitQuantity { max: count });
        }
        Ok(TransferStep::Commit(RemoveRequest {
            panel: descriptor.source,
            index,
            quantity: 1,
        }))
    }

    /// 输入不合法时保持挂起，可以重新输入
    pub fn submit(&mut self, quantity: u32) -> Result<RemoveRequest, TransferError> {
        let pending = self.pending.ok_or(TransferError::NoPendingPrompt)?;
        if quantity == 0 || quantity > pending.max {
            return Err(TransferError::InvalidQuantity {
                requested: quantity,
                max: pending.max,
            });
        }
        self.pending = None;
        Ok(RemoveRequest {
            panel: pending.source,
            index: pending.index,
            quantity,
        })
    }

    /// 关闭输入框，不产生任何请求
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

/// 物品放到标签页上：只改收藏标记，不走数量输入，也不看来源面板
pub fn favorite_request(text: &str, data_tab: &str) -> Result<(ItemIndex, bool), TransferError> {
    let raw: RawDescriptor = serde_json::from_str(text)?;
    if raw.kind != TransferDescriptor::KIND {
        return Err(TransferError::WrongKind(raw.kind));
    }
    let RawIndex { index } = serde_json::from_value(raw.data)?;
    let favorite = Tab::parse(data_tab) == Some(Tab::Favorite);
    Ok((index, favorite))
}

/// 其它面板的开关状态（Alt + 右键转移的目标）
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct OpenPanels {
    pub storage: bool,
    pub cart: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferTarget {
    Storage,
    Cart,
}

impl OpenPanels {
    /// 仓库优先，其次手推车
    pub fn transfer_target(&self) -> Option<TransferTarget> {
        if self.storage {
            Some(TransferTarget::Storage)
        } else if self.cart {
            Some(TransferTarget::Cart)
        } else {
            None
        }
    }
}
