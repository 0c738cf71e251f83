//! Property-based tests for cart invariants.
//!
//! Random operation sequences are checked against a simple model: one entry
//! per id, in first-add order, with a saturating quantity.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use gomarket_cart::prelude::*;
use gomarket_storage::MemoryStore;

const POOL: [&str; 5] = ["a", "b", "c", "d", "e"];

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Inc(usize),
    Dec(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..POOL.len()).prop_map(Op::Add),
        (0..POOL.len()).prop_map(Op::Inc),
        (0..POOL.len()).prop_map(Op::Dec),
    ]
}

fn descriptor(slot: usize) -> NewCartItem {
    let id = POOL[slot];
    NewCartItem::new(id, format!("Product {id}"), format!("https://img/{id}.png"), slot as f64 + 0.99)
}

fn apply(state: &mut CartState, op: &Op) {
    match op {
        Op::Add(slot) => {
            state.add(descriptor(*slot)).unwrap();
        }
        Op::Inc(slot) => {
            state.increment(&ProductId::new(POOL[*slot]));
        }
        Op::Dec(slot) => {
            state.decrement(&ProductId::new(POOL[*slot]));
        }
    }
}

/// Expected lines as `(id, quantity)` in insertion order.
fn model(ops: &[Op]) -> Vec<(&'static str, u32)> {
    let mut lines: Vec<(&'static str, u32)> = Vec::new();
    for op in ops {
        match op {
            Op::Add(slot) => match lines.iter_mut().find(|(id, _)| *id == POOL[*slot]) {
                Some((_, q)) => *q += 1,
                None => lines.push((POOL[*slot], 1)),
            },
            Op::Inc(slot) => {
                if let Some((_, q)) = lines.iter_mut().find(|(id, _)| *id == POOL[*slot]) {
                    *q += 1;
                }
            }
            Op::Dec(slot) => {
                if let Some((_, q)) = lines.iter_mut().find(|(id, _)| *id == POOL[*slot]) {
                    *q = q.saturating_sub(1);
                }
            }
        }
    }
    lines
}

fn stored_item() -> impl Strategy<Value = (String, String, f64, u32)> {
    (any::<String>(), any::<String>(), -1.0e12f64..1.0e12, any::<u32>())
}

// ── State Transition Properties ─────────────────────────────

proptest! {
    /// Ids stay unique and lines are never removed.
    #[test]
    fn lines_unique_and_never_removed(ops in prop::collection::vec(op(), 0..200)) {
        let mut state = CartState::new();
        let mut last_len = 0;

        for op in &ops {
            apply(&mut state, op);

            let ids: HashSet<&str> = state.items().iter().map(|i| i.id.as_str()).collect();
            prop_assert_eq!(ids.len(), state.len(), "duplicate ids in {:?}", state.items());
            prop_assert!(state.len() >= last_len, "line removed after {:?}", op);
            last_len = state.len();
        }
    }

    /// Quantities and line order match the model after any sequence.
    #[test]
    fn quantities_match_model(ops in prop::collection::vec(op(), 0..200)) {
        let mut state = CartState::new();
        for op in &ops {
            apply(&mut state, op);
        }

        let actual: Vec<(&str, u32)> = state
            .items()
            .iter()
            .map(|i| (i.id.as_str(), i.quantity))
            .collect();
        prop_assert_eq!(actual, model(&ops));
    }

    /// Decrementing past zero floors at zero and keeps the line.
    #[test]
    fn decrement_floors_at_zero(quantity in 0u32..1000, extra in 1u32..5) {
        let id = ProductId::new("a");
        let mut state = CartState::from_items(vec![descriptor(0).with_quantity(quantity)]).unwrap();

        for _ in 0..quantity + extra {
            state.decrement(&id);
        }

        prop_assert_eq!(state.len(), 1);
        prop_assert_eq!(state.get(&id).map(|i| i.quantity), Some(0));
    }

    /// Operations on ids outside the cart change nothing.
    #[test]
    fn unknown_ids_are_noops(ops in prop::collection::vec(op(), 0..50), stranger in "[x-z]{1,4}") {
        let mut state = CartState::new();
        for op in &ops {
            apply(&mut state, op);
        }
        let before = state.clone();
        let id = ProductId::new(stranger);

        prop_assert_eq!(state.increment(&id), None);
        prop_assert_eq!(state.decrement(&id), None);
        prop_assert_eq!(state, before);
    }
}

// ── Encoding Properties ─────────────────────────────────────

proptest! {
    /// Any valid cart decodes back to itself, including price bits.
    #[test]
    fn encoded_cart_decodes_to_itself(raw in prop::collection::vec(stored_item(), 0..16)) {
        let items: Vec<CartItem> = raw
            .into_iter()
            .enumerate()
            .map(|(n, (title, image_url, price, quantity))| CartItem {
                id: ProductId::new(format!("p{n}")),
                title,
                image_url,
                price,
                quantity,
            })
            .collect();
        let state = CartState::from_items(items).unwrap();

        let decoded = CartState::decode(&state.encode().unwrap()).unwrap();
        prop_assert_eq!(decoded, state);
    }

    /// Non-finite prices are refused and the cart stays encodable.
    #[test]
    fn non_finite_price_refused(
        ops in prop::collection::vec(op(), 0..30),
        price in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
    ) {
        let mut state = CartState::new();
        for op in &ops {
            apply(&mut state, op);
        }
        let before = state.clone();

        let refused = state.add(NewCartItem::new("a", "A", "ia", price));
        let is_invalid_item = matches!(refused, Err(CartError::InvalidItem { .. }));
        prop_assert!(is_invalid_item);
        prop_assert_eq!(&state, &before);
        prop_assert!(CartState::decode(&state.encode().unwrap()).is_ok());
    }
}

// ── Store Properties ────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// After close, the adapter holds exactly the in-memory cart.
    #[test]
    fn adapter_mirrors_memory(ops in prop::collection::vec(op(), 1..60)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let (expected, reloaded) = runtime.block_on(async {
            let adapter = Arc::new(MemoryStore::new());
            let config = CartConfig::default();

            let cart = CartStore::open(adapter.clone(), &config).await.unwrap();
            for op in &ops {
                match op {
                    Op::Add(slot) => cart.add_to_cart(descriptor(*slot)),
                    Op::Inc(slot) => cart.increment(&ProductId::new(POOL[*slot])),
                    Op::Dec(slot) => cart.decrement(&ProductId::new(POOL[*slot])),
                }
                .unwrap();
            }
            let expected = cart.products().unwrap();
            cart.close().await.unwrap();

            let reopened = CartStore::open(adapter, &config).await.unwrap();
            (expected, reopened.products().unwrap())
        });

        prop_assert_eq!(reloaded, expected);
    }
}
