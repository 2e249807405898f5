//! 客户端 IP 提取
//!
//! `X-Forwarded-For` is honoured only when the TCP peer is a configured
//! trusted proxy (single IP or CIDR). Otherwise the peer address is used.

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::debug;

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    // 支持 ip:port 与纯 IP
    let ip_addr = if let Ok(socket_addr) = ip.parse::<SocketAddr>() {
        socket_addr.ip()
    } else if let Ok(ip_addr) = ip.parse::<IpAddr>() {
        ip_addr
    } else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip_addr, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip_addr)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };
    let Ok(prefix_len) = prefix_len.parse::<u32>() else {
        return false;
    };
    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix_len <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix_len).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix_len <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix_len).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(net) & mask)
        }
        _ => false,
    }
}

/// 取 X-Forwarded-For 的第一个地址（原始客户端），其次 X-Real-IP
pub fn forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

pub fn resolve_source_ip(
    peer_ip: Option<&str>,
    forwarded_ip: Option<String>,
    trusted_proxies: &[String],
) -> Option<String> {
    let peer_ip = peer_ip?;

    if !trusted_proxies.is_empty() && is_trusted_proxy(peer_ip, trusted_proxies) {
        let real_ip = forwarded_ip.unwrap_or_else(|| peer_ip.to_string());
        debug!("Trusted proxy {} -> {}", peer_ip, real_ip);
        return Some(real_ip);
    }

    Some(peer_ip.to_string())
}

/// 从 HttpRequest 提取客户端 IP
pub fn extract_client_ip(req: &HttpRequest, trusted_proxies: &[String]) -> Option<String> {
    let conn_info = req.connection_info();
    resolve_source_ip(
        conn_info.peer_addr(),
        forwarded_ip_from_headers(req.headers()),
        trusted_proxies,
    )
}
