//! Numerica - leftmost-valley excavation over a landscape of heights.
//!
//! A landscape is an ordered sequence of distinct integer heights. The
//! leftmost *valley* (a position strictly lower than each of its present
//! neighbors) can be excavated repeatedly; each excavation yields a
//! *treasure* equal to the mean of the heights from the head through the
//! excavated position, and a new height can be planted back at the
//! excavation site.
//!
//! # Quick Start
//!
//! ```
//! use numerica::landscape::Landscape;
//!
//! let mut landscape = Landscape::new(&[5, 3, 1, 2, 4]);
//!
//! // The leftmost valley is 1 at rank 3: treasure (5 + 3 + 1) / 3.
//! assert_eq!(landscape.get_first(), Some(3.0));
//! assert_eq!(landscape.remove(), Some(3.0));
//!
//! // Plant a new height where the valley was excavated.
//! landscape.insert(6);
//! assert_eq!(landscape.iter().collect::<Vec<_>>(), vec![5, 3, 6, 2, 4]);
//!
//! assert_eq!(landscape.total_treasure(), 3.0);
//! ```

pub mod arena;
pub mod landscape;
