//! 인메모리 저장소
//!
//! 외부 데이터베이스 없이 결정적으로 테스트하기 위한 가짜 저장소.
//! 단일 잠금 아래에서 조건 검사와 기록을 함께 수행하므로
//! insert_bid는 Postgres 구현과 같은 원자성을 가진다.
use crate::bidding::model::{Bid, Item};
use crate::store::{
    ItemPatch, ItemStore, LedgerStore, NewBid, NewItem, SharedStore, StoreError,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct Inner {
    items: BTreeMap<i64, Item>,
    bids: Vec<Bid>,
    next_item_id: i64,
    next_bid_id: i64,
}

pub struct InMemoryStore(RwLock<Inner>);

impl InMemoryStore {
    pub fn new() -> Self {
        Self(RwLock::new(Inner::default()))
    }

    pub fn new_shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn create_item(&self, fields: NewItem) -> Result<Item, StoreError> {
        let mut inner = self.0.write().expect("lock");
        inner.next_item_id += 1;
        let item = Item {
            id: inner.next_item_id,
            title: fields.title,
            description: fields.description,
            image_url: fields.image_url,
            starting_price: fields.starting_price,
            current_price: fields.starting_price,
            is_closed: false,
            created_at: Utc::now(),
        };
        inner.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_item(&self, item_id: i64) -> Result<Item, StoreError> {
        self.0
            .read()
            .expect("lock")
            .items
            .get(&item_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_item(&self, item_id: i64, patch: ItemPatch) -> Result<Item, StoreError> {
        let mut inner = self.0.write().expect("lock");
        let item = inner.items.get_mut(&item_id).ok_or(StoreError::NotFound)?;
        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(description) = patch.description {
            item.description = description;
        }
        if let Some(image_url) = patch.image_url {
            item.image_url = image_url;
        }
        Ok(item.clone())
    }

    async fn delete_item(&self, item_id: i64) -> Result<(), StoreError> {
        let mut inner = self.0.write().expect("lock");
        inner
            .items
            .remove(&item_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let inner = self.0.read().expect("lock");
        let mut items: Vec<Item> = inner.items.values().cloned().collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(items)
    }

    async fn close_item(&self, item_id: i64) -> Result<Item, StoreError> {
        let mut inner = self.0.write().expect("lock");
        let item = inner.items.get_mut(&item_id).ok_or(StoreError::NotFound)?;
        item.is_closed = true;
        Ok(item.clone())
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn insert_bid(&self, bid: NewBid) -> Result<Bid, StoreError> {
        let mut inner = self.0.write().expect("lock");
        let item = inner
            .items
            .get_mut(&bid.item_id)
            .ok_or(StoreError::NotFound)?;
        if item.is_closed || bid.amount <= item.current_price {
            return Err(StoreError::Conflict);
        }
        item.current_price = bid.amount;

        inner.next_bid_id += 1;
        let stored = Bid {
            id: inner.next_bid_id,
            item_id: bid.item_id,
            bidder_id: bid.bidder_id,
            bidder_name: bid.bidder_name,
            amount: bid.amount,
            created_at: Utc::now(),
        };
        inner.bids.push(stored.clone());
        Ok(stored)
    }

    async fn max_amount_for(&self, item_id: i64) -> Result<Option<i64>, StoreError> {
        let inner = self.0.read().expect("lock");
        Ok(inner
            .bids
            .iter()
            .filter(|b| b.item_id == item_id)
            .map(|b| b.amount)
            .max())
    }

    async fn top_bid_for(&self, item_id: i64) -> Result<Option<Bid>, StoreError> {
        let inner = self.0.read().expect("lock");
        let mut top: Option<&Bid> = None;
        for bid in inner.bids.iter().filter(|b| b.item_id == item_id) {
            // 동점이면 먼저 기록된 입찰을 유지한다.
            match top {
                Some(current) if bid.amount <= current.amount => {}
                _ => top = Some(bid),
            }
        }
        Ok(top.cloned())
    }

    async fn bids_for(&self, item_id: i64) -> Result<Vec<Bid>, StoreError> {
        let inner = self.0.read().expect("lock");
        let mut bids: Vec<Bid> = inner
            .bids
            .iter()
            .filter(|b| b.item_id == item_id)
            .cloned()
            .collect();
        bids.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        Ok(bids)
    }

    async fn all_bids(&self) -> Result<Vec<Bid>, StoreError> {
        let inner = self.0.read().expect("lock");
        let mut bids: Vec<Bid> = inner.bids.clone();
        bids.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(bids)
    }

    async fn delete_bids_for(&self, item_id: i64) -> Result<(), StoreError> {
        let mut inner = self.0.write().expect("lock");
        inner.bids.retain(|b| b.item_id != item_id);
        Ok(())
    }
}
