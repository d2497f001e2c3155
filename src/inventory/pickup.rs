use std::sync::Arc;

use super::error::InventoryError;
use super::store::{Accepted, InventoryStore};
use crate::data::schema::ItemDefinition;

/// 能接收拾取物的对象（玩家背包、箱子……），在组装时确定，而不是运行时探测组件
pub trait PickupTarget {
    fn is_bag_acquired(&self) -> bool;
    fn acquire_bag(&mut self);
    fn try_pickup(
        &mut self,
        item: &Arc<ItemDefinition>,
        quantity: u32,
    ) -> Result<Accepted, InventoryError>;
}

impl PickupTarget for InventoryStore {
    fn is_bag_acquired(&self) -> bool {
        InventoryStore::is_bag_acquired(self)
    }

    fn acquire_bag(&mut self) {
        self.set_bag_acquired();
    }

    fn try_pickup(
        &mut self,
        item: &Arc<ItemDefinition>,
        quantity: u32,
    ) -> Result<Accepted, InventoryError> {
        InventoryStore::try_pickup(self, item, quantity)
    }
}

/// 拾取后世界中那件物品该怎么处理
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectDecision {
    /// 全部收下，销毁世界物体
    Consume,
    /// 留在原地，剩余 `remaining` 个
    Leave { remaining: u32 },
    /// 还没拿到背包，需要提示玩家
    NeedBag,
    /// 调用方传了非法数量
    Rejected(InventoryError),
}

/// 触发器碰到物品时调用
pub fn collect<T: PickupTarget + ?Sized>(
    target: &mut T,
    item: &Arc<ItemDefinition>,
    quantity: u32,
) -> CollectDecision {
    if !target.is_bag_acquired() {
        return CollectDecision::NeedBag;
    }
    match target.try_pickup(item, quantity) {
        Ok(Accepted { fully_accepted: true, .. }) => CollectDecision::Consume,
        Ok(Accepted { amount_accepted, .. }) => CollectDecision::Leave {
            remaining: quantity - amount_accepted,
        },
        Err(InventoryError::Full) => CollectDecision::Leave { remaining: quantity },
        Err(InventoryError::BagNotAcquired) => CollectDecision::NeedBag,
        Err(e) => CollectDecision::Rejected(e),
    }
}
