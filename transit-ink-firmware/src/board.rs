//! Board wiring and sizing
//!
//! Raspberry Pi Pico W with a 2.9" IL0373 tri-color panel on SPI0.
//!
//! | Signal | Pin |
//! |--------|-----|
//! | EPD SCK | GPIO18 |
//! | EPD MOSI | GPIO19 |
//! | EPD CS | GPIO17 |
//! | EPD D/C | GPIO20 |
//! | EPD RST, BUSY | not wired |
//! | CYW43 PWR / CS / DIO / CLK | GPIO23 / 25 / 24 / 29 (on board) |

/// Panel SPI clock
pub const EPD_SPI_FREQUENCY: u32 = 1_000_000;

/// Heap for JSON decoding
pub const HEAP_SIZE: usize = 32 * 1024;

/// HTTP response buffer (headers and body)
pub const HTTP_RX_BUFFER_SIZE: usize = 8 * 1024;

/// TLS record buffers
pub const TLS_BUFFER_SIZE: usize = 16 * 1024 + 256;

/// TCP socket buffers
pub const TCP_BUFFER_SIZE: usize = 1024;

/// Sockets available to the IP stack (DHCP, DNS, one TCP connection)
pub const STACK_SOCKETS: usize = 4;
